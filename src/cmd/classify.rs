use playsource::classify;

pub fn cmd_classify(url: &str, ext: Option<&str>) {
    let content_type = classify(url, ext);
    println!("Content type: {content_type}");
}

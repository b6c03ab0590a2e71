/// Build the output file name for a person and a final crop size.
///
/// Uses the first and last whitespace-separated tokens of `name`, so
/// `"Jane Q Public"` becomes `Jane_Public-Crop-120x120.jpg`. A single token is
/// used for both parts. Path separators are replaced so the result is always
/// a plain file name.
pub fn output_filename(name: &str, size: u32) -> String {
    let mut tokens = name.split_whitespace();
    let first = tokens.next().unwrap_or("");
    let last = tokens.last().unwrap_or(first);

    format!(
        "{}_{}-Crop-{size}x{size}.jpg",
        sanitize(first),
        sanitize(last)
    )
}

fn sanitize(token: &str) -> String {
    token.replace(['/', '\\'], "_")
}

use crate::error::{Error, Result};
use crate::slide::Slide;

/// Split a document into slides on lines consisting solely of `separator`.
///
/// Trailing whitespace on the separator line is tolerated; anything else on
/// the line (a table rule such as `|---|---|`, a longer `----`) is content.
/// Blank slides are dropped and the remaining ones numbered densely from 1.
pub fn split_slides(document: &str, separator: &str) -> Result<Vec<Slide>> {
    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];

    for line in document.lines() {
        if line.trim_end() == separator {
            blocks.push(Vec::new());
        } else if let Some(current) = blocks.last_mut() {
            current.push(line);
        }
    }

    let slides: Vec<Slide> = blocks
        .iter()
        .map(|lines| lines.join("\n"))
        .filter(|text| !text.trim().is_empty())
        .enumerate()
        .map(|(i, text)| Slide {
            index: i + 1,
            text: text.trim().to_string(),
        })
        .collect();

    if slides.is_empty() {
        return Err(Error::NoSlides);
    }

    log::debug!("Split document into {} slides", slides.len());
    Ok(slides)
}

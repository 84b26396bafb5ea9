use super::ExportError;
use crate::crawler::PageResult;
use crate::links::Link;

const HEADERS: &[&str] = &[
    "URL",
    "Title",
    "Description",
    "Content",
    "Word Count",
    "Extraction Method",
    "Quality Score",
    "Important Links",
    "Navigation Links",
    "External Links",
];

const IMPORTANT_CAP: usize = 5;
const NAVIGATION_CAP: usize = 10;
const EXTERNAL_CAP: usize = 5;

/// `"text (url)"` for the first `cap` links that have both, joined by `"; "`
fn link_column(links: &[Link], cap: usize) -> String {
    links
        .iter()
        .take(cap)
        .filter(|l| !l.text.is_empty() && !l.url.is_empty())
        .map(|l| format!("{} ({})", l.text, l.url))
        .collect::<Vec<_>>()
        .join("; ")
}

fn page_columns(page: &PageResult) -> Vec<String> {
    vec![
        page.url.clone(),
        page.title.clone(),
        page.description.clone(),
        page.cleaned_content.clone(),
        page.word_count.to_string(),
        page.extraction_method.clone(),
        page.quality_score.to_string(),
        link_column(&page.links.important, IMPORTANT_CAP),
        link_column(&page.links.navigation, NAVIGATION_CAP),
        link_column(&page.links.external, EXTERNAL_CAP),
    ]
}

/// One CSV row per page.
///
/// `multi` adds `Success` and `Error` columns before `Scraped At`; failed
/// pages then keep only their URL and error.
pub fn to_csv(pages: &[PageResult], multi: bool) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);

    let mut headers = HEADERS.to_vec();
    if multi {
        headers.extend(["Success", "Error"]);
    }
    headers.push("Scraped At");
    writer.write_record(&headers)?;

    for page in pages {
        let scraped_at = page.scraped_at.to_rfc3339();
        let mut row = if multi && !page.success {
            let mut row = vec![page.url.clone()];
            row.extend(
                ["", "", "", "0", "", "0", "", "", ""]
                    .iter()
                    .map(|s| s.to_string()),
            );
            row
        } else {
            page_columns(page)
        };

        if multi {
            if page.success {
                row.extend(["Yes".to_string(), String::new()]);
            } else {
                row.extend(["No".to_string(), page.error.clone().unwrap_or_default()]);
            }
        }
        row.push(scraped_at);
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

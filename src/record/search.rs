use crate::document::ParsedDocument;

/// Flatten the searchable parts of a document into one lowercase string.
///
/// Field order is categories, tags, title, summary, plain. Missing fields
/// still take their slot, so the output always holds four separating spaces.
pub fn build_search_content(doc: &ParsedDocument) -> String {
    let categories = doc.categories().join(" ");
    let tags = doc.tags().join(" ");
    let parts = [
        categories.as_str(),
        tags.as_str(),
        doc.title(),
        doc.summary.as_deref().unwrap_or_default(),
        doc.plain.as_deref().unwrap_or_default(),
    ];
    parts.join(" ").to_lowercase()
}

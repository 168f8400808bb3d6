//! Document display formatting

use crate::models::Document;

/// Format a list of documents as a table
pub fn format_document_list(documents: &[Document]) -> String {
    if documents.is_empty() {
        return "No documents found.".to_string();
    }

    let title_width = documents
        .iter()
        .map(|d| d.title.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<36}  {:<title_width$}  {:<19}  {:<9}  {:>10}  {}\n",
        "ID",
        "Title",
        "Type",
        "Access",
        "Size",
        "Uploaded",
        title_width = title_width,
    ));
    output.push_str(&format!(
        "{:-<36}  {:-<title_width$}  {:-<19}  {:-<9}  {:->10}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        title_width = title_width,
    ));

    for document in documents {
        let access = match document.access_level {
            crate::models::AccessLevel::AllShareholders => "all",
            crate::models::AccessLevel::BoardAndManagementOnly => "board",
        };
        output.push_str(&format!(
            "{:<36}  {:<title_width$}  {:<19}  {:<9}  {:>10}  {}\n",
            document.id.as_uuid().to_string(),
            document.title,
            document.document_type.to_string(),
            access,
            format_size(document.file_size),
            document.uploaded_at.format("%Y-%m-%d"),
            title_width = title_width,
        ));
    }

    output
}

/// Format the metadata of one document
pub fn format_document_details(document: &Document) -> String {
    let mut output = String::new();
    output.push_str(&format!("Document: {}\n", document.title));
    output.push_str(&format!("  ID:        {}\n", document.id.as_uuid()));
    output.push_str(&format!("  Type:      {}\n", document.document_type));
    output.push_str(&format!("  Access:    {}\n", document.access_level));
    output.push_str(&format!("  File:      {}\n", document.original_filename));
    output.push_str(&format!("  Size:      {}\n", format_size(document.file_size)));
    output.push_str(&format!("  SHA-256:   {}\n", document.file_hash));

    if let (Some(start), Some(end)) = (document.period_start, document.period_end) {
        output.push_str(&format!("  Period:    {} to {}\n", start, end));
    }
    if document.is_audited {
        output.push_str("  Audited:   yes\n");
    }
    if !document.description.is_empty() {
        output.push_str(&format!("  Notes:     {}\n", document.description));
    }

    output
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

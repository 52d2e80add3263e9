// file: src/generator/prompt.rs
// description: prompt text for section drafting and metadata extraction
// reference: internal prompt conventions

pub const SECTION_FIELD: &str = "section_content";
pub const KB_START: &str = "--- START KNOWLEDGE BASE ---";
pub const KB_END: &str = "--- END KNOWLEDGE BASE ---";

pub fn section_prompt(
    section_title: &str,
    section_body: &str,
    project_summary: &str,
    context: &str,
) -> String {
    format!(
        r#"You are an experienced research compliance officer at a university. Draft one section of a Data Security Plan (DSP) for a new research project.

### 1. Section to write
Title: "{title}"
Drafting instructions from the template: "{body}"

### 2. The new project
{summary}

### 3. Reference examples
The material below comes from previously approved DSPs.
1. Find how the examples handle the "{title}" section.
2. Adapt their strongest language and security controls to the new project.
3. Leave out details that belong to the example projects (names, dates, systems).
4. Keep the tone formal and aligned with NIST 800-171 and CMMC expectations.
5. Do not leave placeholder text such as [PLACEHOLDER].

{kb_start}
{context}
{kb_end}

### 4. Output format
Respond with ONLY a JSON object holding a single key "{field}". Its value is the section body as Markdown: several paragraphs of prose, lists where useful, no section title and no HTML tags.

Example:
{{
  "{field}": "The research team will store all project data on..."
}}
"#,
        title = section_title,
        body = section_body,
        summary = project_summary.trim(),
        kb_start = KB_START,
        context = context,
        kb_end = KB_END,
        field = SECTION_FIELD,
    )
}

pub fn metadata_prompt(summary_text: &str) -> String {
    format!(
        r#"You are helping prepare a Data Security Plan. Read the research project summary below and extract the project facts it states.

Rules:
- Only fill a field when the summary supports it; otherwise omit the field.
- "classification" must be one of: "P3 (Moderate)", "P4 (High)", "HIPAA", "CUI", "Export Controlled".
- "infrastructure" must be one of: "Standalone Workstation", "UCR Research Cluster", "Cloud (AWS/GCP)", "Air-Gapped Server".
- "retention_date" uses the YYYY-MM-DD format.
- "is_cui" is true only when Controlled Unclassified Information is involved.

Respond with ONLY a JSON object using these keys: project_name, pi_name, uisl_name, department, classification, is_cui, data_provider, infrastructure, os_type, transfer_method, retention_date, destruction_method.

--- PROJECT SUMMARY ---
{summary}
--- END PROJECT SUMMARY ---
"#,
        summary = summary_text.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_prompt_embeds_inputs() {
        let prompt = section_prompt(
            "Data Storage",
            "Describe where data is stored.",
            "  Genomics study with NIH data.  ",
            "--- START EXAMPLE DSP: a.docx ---\nStored on NAS.\n--- END EXAMPLE DSP ---\n",
        );

        assert!(prompt.contains("Title: \"Data Storage\""));
        assert!(prompt.contains("Describe where data is stored."));
        assert!(prompt.contains("### 2. The new project\nGenomics study with NIH data.\n"));
        assert!(prompt.contains("--- START KNOWLEDGE BASE ---\n--- START EXAMPLE DSP: a.docx"));
        assert!(prompt.contains("\"section_content\""));

        let start = prompt.find(KB_START).unwrap();
        let end = prompt.find(KB_END).unwrap();
        assert!(start < end);
        assert!(prompt[start..end].contains("Stored on NAS."));
    }

    #[test]
    fn test_metadata_prompt_lists_enums() {
        let prompt = metadata_prompt("We analyze CUI from the Army on an air-gapped server.");

        assert!(prompt.contains("We analyze CUI from the Army"));
        assert!(prompt.contains("\"Export Controlled\""));
        assert!(prompt.contains("\"Air-Gapped Server\""));
        assert!(prompt.contains("destruction_method"));
    }
}

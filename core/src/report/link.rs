use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const DOCX_FILENAME: &str = "diagnosis_and_treatment_plan.docx";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOWNLOAD_LABEL: &str = "Download Diagnosis and Treatment Plan";

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// An HTML anchor that downloads `bytes` as a Word document through a data URI.
pub fn download_link(bytes: &[u8], filename: &str) -> String {
    format!(
        "<a href=\"data:{};base64,{}\" download=\"{}\">{}</a>",
        DOCX_MIME,
        encode_base64(bytes),
        filename.replace('"', ""),
        DOWNLOAD_LABEL
    )
}

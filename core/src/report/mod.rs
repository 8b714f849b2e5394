pub mod docx;
pub mod link;

pub use docx::{REPORT_TITLE, generate_docx};
pub use link::{DOCX_FILENAME, DOCX_MIME, download_link, encode_base64};

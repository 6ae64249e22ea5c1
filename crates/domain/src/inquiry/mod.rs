//! Inquiry domain: support tickets, their answers and attachments.

pub mod answer;
pub mod category;
pub mod file;
pub mod inquiry;
pub mod invariants;

pub use answer::Answer;
pub use category::InquiryCategory;
pub use file::{FileInfo, ImageType};
pub use inquiry::{Inquiry, InquiryId};

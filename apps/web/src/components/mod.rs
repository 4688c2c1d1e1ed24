//! UI Components

mod item_row;
mod result_view;
mod upload_form;

pub use item_row::ItemRow;
pub use result_view::ResultView;
pub use upload_form::UploadForm;

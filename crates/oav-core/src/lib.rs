pub mod config;
pub mod error;
pub mod parse;
pub mod pointer;
pub mod view;

use config::ViewOptions;
use error::ViewError;
use parse::ApiDocument;
use view::{GroupContext, OperationView};

/// Build a view for every operation in the document, in document order.
pub fn operation_views<'a>(
    document: &'a ApiDocument,
    parent: Option<&GroupContext>,
    options: &'a ViewOptions,
) -> Result<Vec<OperationView<'a>>, ViewError> {
    document
        .operations()
        .map(|fragment| OperationView::new(document, fragment, parent, options))
        .collect()
}

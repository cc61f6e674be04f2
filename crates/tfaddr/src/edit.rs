//! deriving a new address from an existing one
use crate::address::{Address, Index};
use crate::error::SyntaxError;

/// Changes to apply to a copy of an address
///
/// Names are free text until the result is rendered and parsed again, which is what
/// [AddressEdit::apply] does before returning.
#[derive(Debug, Clone, Default)]
pub struct AddressEdit {
    pub name: Option<String>,
    pub resource_type: Option<String>,
    pub index: Option<Index>,
    /// (module position, outer-most is 0; new index)
    pub module_indices: Vec<(usize, Index)>,
}

impl AddressEdit {
    pub fn apply(&self, original: &Address) -> Result<Address, EditError> {
        let mut edited = original.clone();

        if let Some(name) = &self.name {
            edited.resource.name = name.clone();
        }
        if let Some(resource_type) = &self.resource_type {
            edited.resource.resource_type = resource_type.clone();
        }
        if let Some(index) = &self.index {
            edited.resource.index = index.clone();
        }
        for (position, index) in &self.module_indices {
            let Some(module) = edited.module_path.get_mut(*position) else {
                return Err(EditError::NoSuchModule {
                    address: original.clone(),
                    position: *position,
                });
            };
            module.index = index.clone();
        }

        let rendered = edited.to_string();
        let reparsed = crate::parse(&rendered).map_err(|source| EditError::InvalidResult {
            rendered: rendered.clone(),
            source,
        })?;
        if reparsed != edited {
            return Err(EditError::Ambiguous(rendered));
        }

        tracing::debug!(%original, %edited, "edited");
        Ok(edited)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EditError {
    #[error("`{address}` has no module at position {position}")]
    NoSuchModule { address: Address, position: usize },
    #[error("`{rendered}` is not a valid address")]
    InvalidResult {
        rendered: String,
        #[source]
        source: SyntaxError,
    },
    #[error("`{0}` does not parse back to the same address")]
    Ambiguous(String),
}

//! Record Field Layouts
//!
//! Output names and identifier lookup for each record type, resolved once
//! and shared process-wide. Keyed by the address of the type's declaration.
//!
//! Population is lazy. Two threads may both build a layout for the same type
//! on first use; they produce identical layouts and the last insert wins.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use log::trace;

use super::scalar;
use crate::value::RecordType;

static LAYOUTS: LazyLock<RwLock<HashMap<usize, Arc<Layout>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Resolved field names of one record type
#[derive(Debug)]
pub struct Layout {
    /// Quoted output name per declared field; `None` for unexported fields
    names: Vec<Option<Box<str>>>,
    /// Declared identifier -> field index, exported fields only
    by_ident: HashMap<&'static str, usize>,
}

impl Layout {
    fn build(ty: &'static RecordType) -> Self {
        let mut names = Vec::with_capacity(ty.fields().len());
        let mut by_ident = HashMap::with_capacity(ty.fields().len());
        for (i, field) in ty.fields().iter().enumerate() {
            if field.is_exported() {
                names.push(Some(scalar::quote(field.encoded_name()).into_boxed_str()));
                by_ident.insert(field.ident(), i);
            } else {
                names.push(None);
            }
        }
        Layout { names, by_ident }
    }

    /// Quoted output name of field `i`, if it is exported
    pub fn encoded_name(&self, i: usize) -> Option<&str> {
        self.names.get(i).and_then(|n| n.as_deref())
    }

    pub fn index_of(&self, ident: &str) -> Option<usize> {
        self.by_ident.get(ident).copied()
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// Layout for `ty`, built on first request.
pub fn layout_of(ty: &'static RecordType) -> Arc<Layout> {
    let key = std::ptr::from_ref(ty) as usize;
    if let Some(layout) = LAYOUTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Arc::clone(layout);
    }

    let layout = Arc::new(Layout::build(ty));
    trace!(
        "cached field layout for record type {} ({} fields)",
        ty.name(),
        layout.len()
    );
    LAYOUTS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, Arc::clone(&layout));
    layout
}

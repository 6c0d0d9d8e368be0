//! Directory listing

use crate::path::SEPARATOR;
use block_store::{Block, EntryHeader};
use std::cmp::Ordering;

/// Field to sort a listing by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    CreatedTime,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// How to order a listing
///
/// Without a sort field entries come out in index order, which is by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    pub sort: Option<SortField>,
    pub order: SortOrder,
}

impl ListOptions {
    /// Sorted listing
    pub fn sorted(field: SortField, order: SortOrder) -> Self {
        Self {
            sort: Some(field),
            order,
        }
    }
}

/// Name of an entry as shown in a listing
///
/// Folders get a trailing separator.
pub fn display_name(header: &EntryHeader) -> String {
    if header.is_directory() {
        format!("{}{}", header.name, SEPARATOR)
    } else {
        header.name.clone()
    }
}

/// Lists the display names of every entry in `block`
pub fn display_names(block: &Block, options: ListOptions) -> Vec<String> {
    let mut headers: Vec<&EntryHeader> = block.entries().collect();

    if let Some(field) = options.sort {
        headers.sort_by(|a, b| {
            let ordering = compare(a, b, field);
            match options.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    headers.into_iter().map(display_name).collect()
}

fn compare(a: &EntryHeader, b: &EntryHeader, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::CreatedTime => a
            .created_time
            .cmp(&b.created_time)
            .then_with(|| a.name.cmp(&b.name)),
    }
}

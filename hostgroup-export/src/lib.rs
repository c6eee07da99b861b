//! Host group extraction for firewall API export archives.
//!
//! A firewall API export is a tar archive with one XML document listing host
//! objects and host groups. This library picks a subset of those groups and
//! builds a new, self-contained document holding only the selected groups and
//! the hosts they reference.
//!
//! # Architecture
//!
//! - [`schema`] — Detect whether the document uses IP or FQDN host objects
//! - [`catalog`] — Sorted, deduplicated group names with 1-based positions
//! - [`selection`] — Resolve operator input (indices, ranges, names)
//! - [`extract`] — Build the filtered output document
//! - [`archive`] — Find, read, and write tar archives
//! - [`config`] — Run configuration loaded from TOML
//! - [`error`] — Fatal conditions and their exit codes
//!
//! # Workflow
//!
//! 1. **Find** the newest `*api-*.tar` and load its XML member
//! 2. **Detect** the host schema
//! 3. **List** the group catalog
//! 4. **Select** groups from operator input
//! 5. **Extract** selected groups plus referenced hosts
//! 6. **Package** the result as `<export-name>.tar`
//!
//! # Examples
//!
//! ```ignore
//! use hostgroup_export::archive::{find_source_archive, load_document, write_archive};
//! use hostgroup_export::catalog::GroupCatalog;
//! use hostgroup_export::extract::extract_groups;
//! use hostgroup_export::schema::detect_schema;
//! use hostgroup_export::selection::parse_selection;
//!
//! let source = find_source_archive(Path::new("."), "api-")?;
//! let loaded = load_document(&source)?;
//! let schema = detect_schema(&loaded.document)?;
//! let catalog = GroupCatalog::enumerate(&loaded.document, schema);
//! let selection = parse_selection("1-3,web", &catalog);
//! let extraction = extract_groups(&loaded.document, schema, &selection.matched);
//! write_archive(Path::new("web.tar"), &loaded.member_name, &extraction.document)?;
//! ```

pub mod archive;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod schema;
pub mod selection;

//! Admin collections exposed as paginated tables.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::view::Column;

/// A record type served by a collection endpoint.
///
/// `cells` must line up one-to-one with `columns`.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    /// Collection name used on the command line and in logs.
    const NAME: &'static str;
    /// Collection endpoint path; `{PATH}/{id}` addresses one record.
    const PATH: &'static str;
    /// Filter names the endpoint understands.
    const FILTERS: &'static [&'static str];

    fn id(&self) -> u64;

    fn columns() -> &'static [Column];

    fn cells(&self) -> Vec<String>;

    /// Label/value pairs for the detail view.
    fn detail(&self) -> Vec<(&'static str, String)>;
}

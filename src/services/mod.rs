// Service exports
pub mod cache;
pub mod supabase;

pub use cache::{CacheKey, CatalogCache};
pub use supabase::{ExporterSession, SupabaseClient, SupabaseError, SupabaseTables};

pub mod google_search_client;

pub use google_search_client::GoogleSearchClient;

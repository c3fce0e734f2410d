mod property_documents;
mod utils;

pub mod gmail;
pub mod google_docs;
pub mod linear;
pub mod notion;
pub mod slack;

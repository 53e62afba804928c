//! Integration tests: full generate → persist → history path against an
//! in-memory odds feed and an in-memory SQLite store.

mod mock_source;
mod pipeline;

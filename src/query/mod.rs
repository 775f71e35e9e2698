pub mod compose;
pub mod option;
pub mod request;

pub use compose::{
    Composer, EmptyFilterPolicy, build_create_request, build_insert_request,
    build_query_request, build_update_request,
};
pub use option::{ChangeOption, Comparison, FilterOption};
pub use request::{CreateRequest, InsertRequest, QueryRequest, Request, UpdateRequest};

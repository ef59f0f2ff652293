//! Row mapping engine

pub mod mapper;
pub mod row;
pub mod template;

pub use mapper::{
    map_sheet, map_sheet_async, read_headers, transform, transform_async, transform_async_with,
    transform_file, transform_file_async, transform_file_async_with, transform_file_to_file,
    transform_file_to_file_async, transform_file_to_file_async_with, transform_file_to_file_with,
    transform_file_with, transform_with, AsyncRowMapper, MapOptions, DEFAULT_HEADER,
};
pub use row::KeyedRow;
pub use template::{TemplateError, TemplateMapper};

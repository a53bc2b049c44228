pub mod formatter;

pub use formatter::{
    component_cell_text, format_program, format_required, format_search_results,
    format_semester_table, format_tsv, should_use_colors,
};

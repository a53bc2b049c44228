pub mod edit;
pub mod storage;
pub mod types;

pub use edit::{apply_edit, resolve, solve_phase, SolvePhase, SubjectEdit};
pub use storage::{get_record_path, load_program};
pub use types::{
    generate_id, Component, ComponentSlot, Components, Program, Semester, Subject, WeightSet,
};

pub mod course;
pub mod department;

pub use course::{Course, NewCourseRequest, Semester, UpdateCourseRequest};
pub use department::{
    Department, DepartmentImport, NewDepartmentRequest, UpdateDepartmentRequest,
};

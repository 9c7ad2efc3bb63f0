mod student;

pub(crate) use student::validate_contact;
pub use student::{
    AdditionalCharge, CheckoutRequest, FeeCategory, FeeConfiguration, NewStudent, Student,
    StudentStatus, UpdateStudentRequest,
};

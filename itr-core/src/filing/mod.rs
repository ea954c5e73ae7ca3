//! Return filing flow: PAN validation, form selection and the step reducer.

mod itr_form;
mod pan;
mod wizard;

pub use itr_form::{ITR1_INCOME_LIMIT, ItrForm};
pub use pan::{InvalidPan, Pan};
pub use wizard::{
    FilingAction, FilingError, FilingState, FilingStep, FilingWizard, IncomeDetails,
    PersonalDetails,
};

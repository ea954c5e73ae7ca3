//! Step-by-step return filing flow as an explicit reducer.
//!
//! | Step            | Leaves when                                      |
//! |-----------------|--------------------------------------------------|
//! | PersonalDetails | name present, PAN well formed, age plausible     |
//! | IncomeDetails   | income entered, no negative amounts              |
//! | Deductions      | no negative claims                               |
//! | RegimeSelection | always; the recommended regime is the default    |
//! | Review          | only through `Submit`                            |
//! | Submitted       | never                                            |
//!
//! Validation errors are stored on the state and block navigation. `Submit`
//! rechecks every section, since any of them can be edited later. Entering
//! `RegimeSelection` or `Review` runs the regime comparison on the entered
//! data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::itr_form::ItrForm;
use super::pan::{InvalidPan, Pan};
use crate::calculations::{RegimeComparison, RegimeWorksheetInput, WorksheetError};
use crate::models::{DeductionClaims, RegimeKind, TaxpayerProfile, YearRules};

const MAX_AGE: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FilingStep {
    #[default]
    PersonalDetails,
    IncomeDetails,
    Deductions,
    RegimeSelection,
    Review,
    Submitted,
}

impl FilingStep {
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::PersonalDetails => Some(Self::IncomeDetails),
            Self::IncomeDetails => Some(Self::Deductions),
            Self::Deductions => Some(Self::RegimeSelection),
            Self::RegimeSelection => Some(Self::Review),
            Self::Review | Self::Submitted => None,
        }
    }

    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::PersonalDetails | Self::Submitted => None,
            Self::IncomeDetails => Some(Self::PersonalDetails),
            Self::Deductions => Some(Self::IncomeDetails),
            Self::RegimeSelection => Some(Self::Deductions),
            Self::Review => Some(Self::RegimeSelection),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalDetails => "personal details",
            Self::IncomeDetails => "income details",
            Self::Deductions => "deductions",
            Self::RegimeSelection => "regime selection",
            Self::Review => "review",
            Self::Submitted => "submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub name: String,

    /// As typed; validated when leaving the step.
    pub pan: String,

    pub age: u32,
    pub is_resident: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeDetails {
    pub salary_income: Decimal,
    #[serde(default)]
    pub other_income: Decimal,
    #[serde(default)]
    pub business_income: Decimal,
    pub is_salaried: bool,
}

impl IncomeDetails {
    pub fn total(&self) -> Decimal {
        self.salary_income + self.other_income + self.business_income
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilingAction {
    SetPersonalDetails(PersonalDetails),
    SetIncomeDetails(IncomeDetails),
    SetDeductions(DeductionClaims),
    SelectRegime(RegimeKind),
    Next,
    Back,
    Submit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilingError {
    #[error("{} have not been entered", .0.as_str())]
    MissingSection(FilingStep),

    #[error("name must not be empty")]
    EmptyName,

    #[error(transparent)]
    InvalidPan(#[from] InvalidPan),

    #[error("age must be between 1 and 120, got {0}")]
    InvalidAge(u32),

    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("the return can only be submitted from review, currently at {}", .0.as_str())]
    NotAtReview(FilingStep),

    #[error("use submit to file the return from review")]
    SubmitRequired,

    #[error("the return has already been submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Worksheet(#[from] WorksheetError),
}

/// Everything entered so far plus derived results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilingState {
    pub step: FilingStep,
    pub personal: Option<PersonalDetails>,
    pub pan: Option<Pan>,
    pub income: Option<IncomeDetails>,
    pub deductions: DeductionClaims,
    pub selected_regime: Option<RegimeKind>,
    pub comparison: Option<RegimeComparison>,
    pub suggested_form: Option<ItrForm>,
    pub errors: Vec<FilingError>,
}

impl FilingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Reducer for the filing flow of one assessment year.
#[derive(Debug, Clone, Copy)]
pub struct FilingWizard<'a> {
    rules: &'a YearRules,
}

impl<'a> FilingWizard<'a> {
    pub fn new(rules: &'a YearRules) -> Self {
        Self { rules }
    }

    /// Applies `action` to `state`, returning the next state.
    ///
    /// Errors from the previous action are cleared first; any raised by this
    /// action are left in `errors`.
    pub fn reduce(
        &self,
        mut state: FilingState,
        action: FilingAction,
    ) -> FilingState {
        if state.step == FilingStep::Submitted {
            state.errors = vec![FilingError::AlreadySubmitted];
            return state;
        }
        state.errors.clear();

        match action {
            FilingAction::SetPersonalDetails(details) => {
                state.personal = Some(details);
                state.pan = None;
                state.comparison = None;
            }
            FilingAction::SetIncomeDetails(details) => {
                state.income = Some(details);
                state.comparison = None;
            }
            FilingAction::SetDeductions(claims) => {
                state.deductions = claims;
                state.comparison = None;
            }
            FilingAction::SelectRegime(kind) => state.selected_regime = Some(kind),
            FilingAction::Next => state = self.advance(state),
            FilingAction::Back => {
                if let Some(previous) = state.step.previous() {
                    state.step = previous;
                }
            }
            FilingAction::Submit => state = self.submit(state),
        }

        state
    }

    fn advance(
        &self,
        mut state: FilingState,
    ) -> FilingState {
        let Some(next) = state.step.next() else {
            state.errors.push(FilingError::SubmitRequired);
            return state;
        };

        state.errors = Self::validate_section(state.step, &mut state);
        if state.has_errors() {
            return state;
        }

        if matches!(next, FilingStep::RegimeSelection | FilingStep::Review) {
            if let Err(err) = self.refresh_comparison(&mut state) {
                state.errors.push(err);
                return state;
            }
        }

        debug!(from = state.step.as_str(), to = next.as_str(), "filing step advanced");
        state.step = next;
        state
    }

    fn submit(
        &self,
        mut state: FilingState,
    ) -> FilingState {
        if state.step != FilingStep::Review {
            state.errors.push(FilingError::NotAtReview(state.step));
            return state;
        }

        // Sections can be edited after their step was left; recheck them all.
        let errors: Vec<FilingError> = [
            FilingStep::PersonalDetails,
            FilingStep::IncomeDetails,
            FilingStep::Deductions,
        ]
        .into_iter()
        .flat_map(|step| Self::validate_section(step, &mut state))
        .collect();
        if !errors.is_empty() {
            state.errors = errors;
            return state;
        }

        if state.comparison.is_none() {
            if let Err(err) = self.refresh_comparison(&mut state) {
                state.errors.push(err);
                return state;
            }
        }

        info!(
            year = %self.rules.assessment_year,
            regime = ?state.selected_regime,
            form = ?state.suggested_form,
            "return submitted"
        );
        state.step = FilingStep::Submitted;
        state
    }

    /// Checks the data `step` collects. Also caches the parsed PAN.
    fn validate_section(
        step: FilingStep,
        state: &mut FilingState,
    ) -> Vec<FilingError> {
        let mut errors = Vec::new();

        match step {
            FilingStep::PersonalDetails => {
                let Some(personal) = &state.personal else {
                    return vec![FilingError::MissingSection(FilingStep::PersonalDetails)];
                };
                if personal.name.trim().is_empty() {
                    errors.push(FilingError::EmptyName);
                }
                let pan = Pan::parse(&personal.pan);
                if personal.age == 0 || personal.age > MAX_AGE {
                    errors.push(FilingError::InvalidAge(personal.age));
                }
                match pan {
                    Ok(pan) => state.pan = Some(pan),
                    Err(err) => {
                        state.pan = None;
                        errors.push(err.into());
                    }
                }
            }
            FilingStep::IncomeDetails => {
                let Some(income) = &state.income else {
                    return vec![FilingError::MissingSection(FilingStep::IncomeDetails)];
                };
                let amounts = [
                    ("salaryIncome", income.salary_income),
                    ("otherIncome", income.other_income),
                    ("businessIncome", income.business_income),
                ];
                errors.extend(
                    amounts
                        .into_iter()
                        .filter(|(_, value)| *value < Decimal::ZERO)
                        .map(|(field, value)| FilingError::NegativeAmount { field, value }),
                );
            }
            FilingStep::Deductions => {
                if let Some((field, value)) = state.deductions.first_negative() {
                    errors.push(FilingError::NegativeAmount { field, value });
                }
            }
            FilingStep::RegimeSelection | FilingStep::Review | FilingStep::Submitted => {}
        }

        errors
    }

    fn refresh_comparison(
        &self,
        state: &mut FilingState,
    ) -> Result<(), FilingError> {
        let personal = state
            .personal
            .as_ref()
            .ok_or(FilingError::MissingSection(FilingStep::PersonalDetails))?;
        let income = state
            .income
            .as_ref()
            .ok_or(FilingError::MissingSection(FilingStep::IncomeDetails))?;

        let input = RegimeWorksheetInput {
            salary_income: income.salary_income,
            other_income: income.other_income + income.business_income,
            is_salaried: income.is_salaried,
            profile: TaxpayerProfile::new(personal.age, personal.is_resident),
            claims: state.deductions.clone(),
        };
        let comparison = RegimeComparison::between(self.rules, &input)?;

        state.selected_regime.get_or_insert(comparison.recommended);
        state.suggested_form = Some(ItrForm::suggest(
            income.total(),
            personal.is_resident,
            income.business_income > Decimal::ZERO,
        ));
        state.comparison = Some(comparison);
        Ok(())
    }
}

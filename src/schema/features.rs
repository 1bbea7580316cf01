//! Employee feature record accepted by the prediction endpoint

use serde::Serialize;
use serde_json::Value;

use super::frame::{FeatureFrame, FeatureValue};
use super::validation::{Bounds, Choice, FieldReader, ValidationErrors};

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl Choice for $name {
            const VARIANTS: &'static [(&'static str, Self)] = &[$(($wire, $name::$variant)),+];
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    /// Gender of the employee
    Gender { Male => "Male", Female => "Female" }
);

choice_enum!(
    /// Marital status of the employee
    MaritalStatus { Single => "Single", Married => "Married", Divorced => "Divorced" }
);

choice_enum!(
    /// Department of the employee
    Department {
        Sales => "Sales",
        ResearchAndDevelopment => "Research & Development",
        HumanResources => "Human Resources",
    }
);

choice_enum!(
    /// Frequency of business travel
    BusinessTravel {
        TravelRarely => "Travel_Rarely",
        TravelFrequently => "Travel_Frequently",
        NonTravel => "Non-Travel",
    }
);

choice_enum!(
    /// Whether the employee works overtime
    OverTime { Yes => "Yes", No => "No" }
);

/// Wire names of every feature, in frame column order
pub const FEATURE_COLUMNS: [&str; 30] = [
    "Age",
    "Gender",
    "MaritalStatus",
    "Department",
    "JobRole",
    "JobLevel",
    "JobInvolvement",
    "MonthlyIncome",
    "PercentSalaryHike",
    "StockOptionLevel",
    "BusinessTravel",
    "DistanceFromHome",
    "OverTime",
    "WorkLifeBalance",
    "JobSatisfaction",
    "EnvironmentSatisfaction",
    "RelationshipSatisfaction",
    "PerformanceRating",
    "TotalWorkingYears",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
    "DailyRate",
    "HourlyRate",
    "MonthlyRate",
    "NumCompaniesWorked",
    "Education",
    "EducationField",
    "TrainingTimesLastYear",
];

/// Columns whose frame values are categories; every other column is numeric
pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    "Gender",
    "MaritalStatus",
    "Department",
    "JobRole",
    "BusinessTravel",
    "OverTime",
    "EducationField",
];

/// Kind of value a frame column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Kind of `column`, or `None` if it is not a feature
pub fn column_kind(column: &str) -> Option<ColumnKind> {
    if !FEATURE_COLUMNS.contains(&column) {
        None
    } else if CATEGORICAL_COLUMNS.contains(&column) {
        Some(ColumnKind::Categorical)
    } else {
        Some(ColumnKind::Numeric)
    }
}

/// One employee's attributes at prediction time.
///
/// Only constructed through [`FeatureRecord::from_json`], so every value has
/// passed its range or enumeration check and every free-text field is trimmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureRecord {
    // Demographics
    pub age: i64,
    pub gender: Gender,
    pub marital_status: MaritalStatus,

    // Job & role
    pub department: Department,
    pub job_role: String,
    pub job_level: i64,
    pub job_involvement: i64,

    // Compensation
    pub monthly_income: i64,
    pub percent_salary_hike: i64,
    pub stock_option_level: i64,

    // Work conditions
    pub business_travel: BusinessTravel,
    pub distance_from_home: i64,
    pub over_time: OverTime,
    pub work_life_balance: i64,

    // Satisfaction & performance
    pub job_satisfaction: i64,
    pub environment_satisfaction: i64,
    pub relationship_satisfaction: i64,
    pub performance_rating: i64,

    // Experience
    pub total_working_years: i64,
    pub years_at_company: i64,
    pub years_in_current_role: i64,
    pub years_since_last_promotion: i64,
    pub years_with_curr_manager: i64,

    // Rates and background
    pub daily_rate: i64,
    pub hourly_rate: i64,
    pub monthly_rate: i64,
    pub num_companies_worked: i64,
    pub education: i64,
    pub education_field: String,
    pub training_times_last_year: i64,
}

impl FeatureRecord {
    /// Validate and normalize an untyped record.
    ///
    /// All fields are checked before returning; the error lists every
    /// violation. Unknown fields are ignored.
    pub fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let mut r = FieldReader::new(value)?;
        let score = Bounds::ge(1).le(4);
        let non_negative = Bounds::ge(0);
        let positive = Bounds::gt(0);

        let record = Self {
            age: r.integer("Age", Bounds::gt(0).lt(100)),
            gender: r.choice("Gender"),
            marital_status: r.choice("MaritalStatus"),
            department: r.choice("Department"),
            job_role: r.text("JobRole"),
            job_level: r.integer("JobLevel", Bounds::ge(1).le(5)),
            job_involvement: r.integer("JobInvolvement", score),
            monthly_income: r.integer("MonthlyIncome", positive),
            percent_salary_hike: r.integer("PercentSalaryHike", Bounds::ge(0).le(100)),
            stock_option_level: r.integer("StockOptionLevel", Bounds::ge(0).le(3)),
            business_travel: r.choice("BusinessTravel"),
            distance_from_home: r.integer("DistanceFromHome", non_negative),
            over_time: r.choice("OverTime"),
            work_life_balance: r.integer("WorkLifeBalance", score),
            job_satisfaction: r.integer("JobSatisfaction", score),
            environment_satisfaction: r.integer("EnvironmentSatisfaction", score),
            relationship_satisfaction: r.integer("RelationshipSatisfaction", score),
            performance_rating: r.integer("PerformanceRating", score),
            total_working_years: r.integer("TotalWorkingYears", non_negative),
            years_at_company: r.integer("YearsAtCompany", non_negative),
            years_in_current_role: r.integer("YearsInCurrentRole", non_negative),
            years_since_last_promotion: r.integer("YearsSinceLastPromotion", non_negative),
            years_with_curr_manager: r.integer("YearsWithCurrManager", non_negative),
            daily_rate: r.integer("DailyRate", positive),
            hourly_rate: r.integer("HourlyRate", positive),
            monthly_rate: r.integer("MonthlyRate", positive),
            num_companies_worked: r.integer("NumCompaniesWorked", non_negative),
            education: r.integer("Education", Bounds::ge(1).le(5)),
            education_field: r.text("EducationField"),
            training_times_last_year: r.integer("TrainingTimesLastYear", non_negative),
        };

        r.finish()?;
        Ok(record)
    }

    /// Feature values in [`FEATURE_COLUMNS`] order
    pub fn values(&self) -> Vec<FeatureValue> {
        use FeatureValue::{Category, Number};
        let n = |v: i64| Number(v as f64);
        vec![
            n(self.age),
            Category(self.gender.as_str().to_string()),
            Category(self.marital_status.as_str().to_string()),
            Category(self.department.as_str().to_string()),
            Category(self.job_role.clone()),
            n(self.job_level),
            n(self.job_involvement),
            n(self.monthly_income),
            n(self.percent_salary_hike),
            n(self.stock_option_level),
            Category(self.business_travel.as_str().to_string()),
            n(self.distance_from_home),
            Category(self.over_time.as_str().to_string()),
            n(self.work_life_balance),
            n(self.job_satisfaction),
            n(self.environment_satisfaction),
            n(self.relationship_satisfaction),
            n(self.performance_rating),
            n(self.total_working_years),
            n(self.years_at_company),
            n(self.years_in_current_role),
            n(self.years_since_last_promotion),
            n(self.years_with_curr_manager),
            n(self.daily_rate),
            n(self.hourly_rate),
            n(self.monthly_rate),
            n(self.num_companies_worked),
            n(self.education),
            Category(self.education_field.clone()),
            n(self.training_times_last_year),
        ]
    }

    /// Single-row frame for the model
    pub fn to_frame(&self) -> FeatureFrame {
        FeatureFrame::single(&FEATURE_COLUMNS, self.values())
    }

    /// Payload stored in the prediction log
    pub fn to_payload(&self) -> Value {
        // Only strings and integers; serializing cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_body() -> Value {
        json!({
            "Age": 30,
            "Gender": "Male",
            "MaritalStatus": "Single",
            "Department": "Sales",
            "JobRole": "Sales Executive",
            "JobLevel": 2,
            "MonthlyIncome": 5000,
            "OverTime": "Yes",
            "WorkLifeBalance": 3,
            "YearsAtCompany": 5,
            "BusinessTravel": "Travel_Rarely",
            "DistanceFromHome": 5,
            "DailyRate": 1000,
            "Education": 3,
            "EducationField": "Life Sciences",
            "EnvironmentSatisfaction": 3,
            "HourlyRate": 60,
            "JobInvolvement": 3,
            "JobSatisfaction": 3,
            "MonthlyRate": 20000,
            "NumCompaniesWorked": 1,
            "PercentSalaryHike": 12,
            "PerformanceRating": 3,
            "RelationshipSatisfaction": 3,
            "StockOptionLevel": 1,
            "TotalWorkingYears": 8,
            "TrainingTimesLastYear": 3,
            "YearsInCurrentRole": 3,
            "YearsSinceLastPromotion": 1,
            "YearsWithCurrManager": 3
        })
    }

    pub(crate) fn sample_record() -> FeatureRecord {
        FeatureRecord::from_json(&sample_body()).expect("sample record is valid")
    }

    #[test]
    fn accepts_reference_record() {
        let record = sample_record();
        assert_eq!(record.age, 30);
        assert_eq!(record.department, Department::Sales);
        assert_eq!(record.business_travel, BusinessTravel::TravelRarely);
        assert_eq!(record.over_time, OverTime::Yes);
        assert_eq!(record.education_field, "Life Sciences");
    }

    #[test]
    fn age_zero_is_rejected() {
        let mut body = sample_body();
        body["Age"] = json!(0);
        let errors = FeatureRecord::from_json(&body).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_field("Age"));
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let mut body = sample_body();
        body["Gender"] = json!("Other");
        let errors = FeatureRecord::from_json(&body).unwrap_err();
        assert!(errors.contains_field("Gender"));
        assert_eq!(errors.violations()[0].message, "Input should be 'Male' or 'Female'");
    }

    #[test]
    fn every_field_is_required() {
        for column in FEATURE_COLUMNS {
            let mut body = sample_body();
            body.as_object_mut().unwrap().remove(column);
            let errors = FeatureRecord::from_json(&body).unwrap_err();
            assert_eq!(errors.len(), 1, "removing {}", column);
            assert!(errors.contains_field(column));
        }
    }

    #[test]
    fn all_violations_are_reported() {
        let mut body = sample_body();
        body["Age"] = json!(100);
        body["JobLevel"] = json!(6);
        body["OverTime"] = json!("Maybe");
        body["MonthlyIncome"] = json!(0);
        body.as_object_mut().unwrap().remove("EducationField");
        let errors = FeatureRecord::from_json(&body).unwrap_err();
        assert_eq!(errors.len(), 5);
        for field in ["Age", "JobLevel", "OverTime", "MonthlyIncome", "EducationField"] {
            assert!(errors.contains_field(field), "{} missing", field);
        }
    }

    #[test]
    fn free_text_is_trimmed() {
        let mut body = sample_body();
        body["JobRole"] = json!("  Sales Executive ");
        body["EducationField"] = json!("\tLife Sciences");
        let record = FeatureRecord::from_json(&body).unwrap();
        assert_eq!(record.job_role, "Sales Executive");
        assert_eq!(record.education_field, "Life Sciences");

        // Feeding the normalized payload back in changes nothing.
        let again = FeatureRecord::from_json(&record.to_payload()).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn padded_department_is_rejected() {
        let mut body = sample_body();
        body["Department"] = json!(" Research & Development ");
        let errors = FeatureRecord::from_json(&body).unwrap_err();
        assert!(errors.contains_field("Department"));

        body["Department"] = json!("Research & Development");
        let record = FeatureRecord::from_json(&body).unwrap();
        assert_eq!(record.department, Department::ResearchAndDevelopment);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let mut body = sample_body();
        body["Age"] = json!("30");
        body["MonthlyIncome"] = json!(" 5000 ");
        let record = FeatureRecord::from_json(&body).unwrap();
        assert_eq!(record.age, 30);
        assert_eq!(record.monthly_income, 5000);

        body["Age"] = json!("0");
        let errors = FeatureRecord::from_json(&body).unwrap_err();
        assert!(errors.contains_field("Age"));
        assert_eq!(errors.violations()[0].message, "Input should be greater than 0");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let mut body = sample_body();
        body["EmployeeNumber"] = json!(1234);
        assert!(FeatureRecord::from_json(&body).is_ok());
    }

    #[test]
    fn payload_uses_wire_names() {
        let payload = sample_record().to_payload();
        let obj = payload.as_object().unwrap();
        assert_eq!(obj.len(), FEATURE_COLUMNS.len());
        for column in FEATURE_COLUMNS {
            assert!(obj.contains_key(column), "{} missing", column);
        }
        assert_eq!(payload["BusinessTravel"], "Travel_Rarely");
    }

    #[test]
    fn frame_matches_payload() {
        let record = sample_record();
        let payload = record.to_payload();
        let frame = record.to_frame();
        assert_eq!(frame.len(), 1);
        for column in FEATURE_COLUMNS {
            match (frame.get(0, column).unwrap(), &payload[column]) {
                (FeatureValue::Number(n), Value::Number(expected)) => {
                    assert_eq!(Some(*n), expected.as_f64(), "{}", column)
                }
                (FeatureValue::Category(c), Value::String(expected)) => {
                    assert_eq!(c, expected, "{}", column)
                }
                (got, want) => panic!("{}: {:?} vs {:?}", column, got, want),
            }
        }
    }

    #[test]
    fn column_kinds_match_frame_values() {
        let frame = sample_record().to_frame();
        for column in FEATURE_COLUMNS {
            let value = frame.get(0, column).unwrap();
            match column_kind(column) {
                Some(ColumnKind::Numeric) => assert!(value.as_number().is_some(), "{}", column),
                Some(ColumnKind::Categorical) => {
                    assert!(value.as_category().is_some(), "{}", column)
                }
                None => panic!("{} has no kind", column),
            }
        }
        assert_eq!(column_kind("Salary"), None);
    }
}

use crate::messaging::Role;
use crate::prediction::{GradeSymbol, InspectionRecord};
use serde::{Deserialize, Serialize};

/// Context captured alongside the inspection, depending on who is asking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleContext {
    Customer,
    Owner {
        #[serde(default = "default_restaurant_name")]
        restaurant_name: String,
    },
    Authority {
        #[serde(default = "default_location")]
        location: String,
        #[serde(default = "default_cuisine")]
        cuisine: String,
    },
}

fn default_restaurant_name() -> String {
    "Pizza Place in Brooklyn".to_string()
}

fn default_location() -> String {
    "Queens".to_string()
}

fn default_cuisine() -> String {
    "Chinese".to_string()
}

impl RoleContext {
    pub fn role(&self) -> Role {
        match self {
            Self::Customer => Role::Customer,
            Self::Owner { .. } => Role::Owner,
            Self::Authority { .. } => Role::Authority,
        }
    }

    /// Context for `role` with the form's default values.
    pub fn defaults_for(role: Role) -> Self {
        match role {
            Role::Customer => Self::Customer,
            Role::Owner => Self::Owner {
                restaurant_name: default_restaurant_name(),
            },
            Role::Authority => Self::Authority {
                location: default_location(),
                cuisine: default_cuisine(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportField {
    pub label: &'static str,
    pub value: String,
}

impl ReportField {
    fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// A finished prediction with everything needed to export it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub context: RoleContext,
    pub grade: GradeSymbol,
    pub score: i32,
    pub critical_flag: String,
    pub inspection_month: u32,
    pub message: &'static str,
}

impl ResultRecord {
    pub fn new(context: RoleContext, record: &InspectionRecord, grade: GradeSymbol) -> Self {
        let message = context.role().guidance(grade.as_str());
        Self {
            context,
            grade,
            score: record.score(),
            critical_flag: record.critical_flag().to_string(),
            inspection_month: record.inspection_month(),
            message,
        }
    }

    pub fn role(&self) -> Role {
        self.context.role()
    }

    pub fn title(&self) -> &'static str {
        match self.role() {
            Role::Customer => "Customer Report",
            Role::Owner => "Restaurant Owner Report",
            Role::Authority => "Health Authority Report",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self.role() {
            Role::Customer => "customer_report",
            Role::Owner => "owner_report",
            Role::Authority => "authority_report",
        }
    }

    /// Columns of the tabular export, in output order.
    pub fn csv_fields(&self) -> Vec<ReportField> {
        let mut fields = self.context_fields();
        fields.push(ReportField::new("Predicted Grade", self.grade));
        fields.push(ReportField::new("Score", self.score));
        fields.push(ReportField::new("Critical Flag", &self.critical_flag));
        let message_label = match self.role() {
            Role::Customer => "Message",
            Role::Owner => "Recommendation",
            Role::Authority => "Action",
        };
        fields.push(ReportField::new(message_label, self.message));
        fields
    }

    /// Rows of the document table; the message goes below the table instead.
    pub fn pdf_fields(&self) -> Vec<ReportField> {
        let mut fields = self.context_fields();
        fields.push(ReportField::new("Predicted Grade", self.grade));
        fields.push(ReportField::new("Score", self.score));
        fields.push(ReportField::new("Critical Flag", &self.critical_flag));
        let month_label = match self.role() {
            Role::Customer => "Inspection Month",
            Role::Owner => "Scheduled Month",
            Role::Authority => "Planned Month",
        };
        fields.push(ReportField::new(month_label, self.inspection_month));
        fields
    }

    fn context_fields(&self) -> Vec<ReportField> {
        match &self.context {
            RoleContext::Customer => Vec::new(),
            RoleContext::Owner { restaurant_name } => {
                vec![ReportField::new("Restaurant", restaurant_name)]
            }
            RoleContext::Authority { location, cuisine } => vec![
                ReportField::new("Location", location),
                ReportField::new("Cuisine", cuisine),
            ],
        }
    }
}

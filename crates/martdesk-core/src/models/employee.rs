use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub employee_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Body of `POST /employees` and `PUT /employees/:id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub department: String,
}

impl Default for EmployeeForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: Role::Employee,
            department: String::new(),
        }
    }
}

impl From<&Employee> for EmployeeForm {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone().unwrap_or_default(),
            role: employee.role,
            department: employee.department.clone().unwrap_or_default(),
        }
    }
}

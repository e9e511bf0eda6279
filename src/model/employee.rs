use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Ayesha Khan",
        "gender": "Female",
        "age": 29,
        "position": "Engineer",
        "department": "Platform",
        "phone": "+923001234567",
        "email": "ayesha.khan@company.com",
        "status": "Active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Ayesha Khan")]
    pub name: String,

    #[schema(example = "Female")]
    pub gender: String,

    #[schema(example = 29)]
    pub age: u32,

    #[schema(example = "Engineer")]
    pub position: String,

    #[schema(example = "Platform")]
    pub department: String,

    #[schema(example = "+923001234567")]
    pub phone: String,

    #[schema(example = "ayesha.khan@company.com")]
    pub email: String,

    /// Free text ("Active", "On Leave"), advisory only.
    #[schema(example = "Active")]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "Ayesha Khan")]
    pub name: String,
    #[schema(example = "Female")]
    pub gender: String,
    #[schema(example = 29)]
    pub age: u32,
    #[schema(example = "Engineer")]
    pub position: String,
    #[schema(example = "Platform")]
    pub department: String,
    #[schema(example = "+923001234567")]
    pub phone: String,
    #[schema(example = "ayesha.khan@company.com")]
    pub email: String,
    #[schema(example = "Active")]
    pub status: String,
}

impl NewEmployee {
    pub fn into_employee(self, id: u64) -> Employee {
        Employee {
            id,
            name: self.name,
            gender: self.gender,
            age: self.age,
            position: self.position,
            department: self.department,
            phone: self.phone,
            email: self.email,
            status: self.status,
        }
    }
}

/// Partial update for an employee. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.age.is_none()
            && self.position.is_none()
            && self.department.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.status.is_none()
    }

    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(gender) = self.gender {
            employee.gender = gender;
        }
        if let Some(age) = self.age {
            employee.age = age;
        }
        if let Some(position) = self.position {
            employee.position = position;
        }
        if let Some(department) = self.department {
            employee.department = department;
        }
        if let Some(phone) = self.phone {
            employee.phone = phone;
        }
        if let Some(email) = self.email {
            employee.email = email;
        }
        if let Some(status) = self.status {
            employee.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Employee {
        Employee {
            id: 7,
            name: "Ayesha Khan".to_string(),
            gender: "Female".to_string(),
            age: 29,
            position: "Engineer".to_string(),
            department: "Platform".to_string(),
            phone: "+923001234567".to_string(),
            email: "ayesha@company.com".to_string(),
            status: "Active".to_string(),
        }
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(EmployeePatch::default().is_empty());
        let patch = EmployeePatch {
            age: Some(30),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut employee = sample();
        EmployeePatch {
            position: Some("Lead Engineer".to_string()),
            status: Some("On Leave".to_string()),
            ..Default::default()
        }
        .apply_to(&mut employee);

        assert_eq!(employee.position, "Lead Engineer");
        assert_eq!(employee.status, "On Leave");
        assert_eq!(employee.name, "Ayesha Khan");
        assert_eq!(employee.department, "Platform");
        assert_eq!(employee.age, 29);
    }
}

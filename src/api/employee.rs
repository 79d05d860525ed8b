use serde::Deserialize;
use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::model::employee::{CreateEmployee, DepartmentStat, Employee, UpdateEmployee};
use crate::models::Ack;
use crate::routes;

#[derive(Deserialize)]
struct EmployeeBody {
    #[serde(default)]
    employee: Option<Employee>,
}

#[derive(Deserialize)]
struct EmployeeListBody {
    #[serde(default)]
    employees: Vec<Employee>,
}

#[derive(Deserialize)]
struct DepartmentStatsBody {
    #[serde(default)]
    stats: Vec<DepartmentStat>,
}

fn require_employee(body: EmployeeBody) -> Result<Employee> {
    body.employee
        .ok_or_else(|| ClientError::Rejected("Employee not found in response".into()))
}

impl ApiClient {
    /// Profile of the logged-in employee.
    pub async fn my_profile(&self) -> Result<Employee> {
        self.session().require_login()?;
        require_employee(self.get(routes::MY_PROFILE).await?)
    }

    pub async fn list_employees(&self) -> Result<Vec<Employee>> {
        self.session().require_admin()?;
        let body: EmployeeListBody = self.get(routes::EMPLOYEES).await?;
        Ok(body.employees)
    }

    pub async fn get_employee(&self, id: &str) -> Result<Employee> {
        self.session().require_admin()?;
        require_employee(self.get(&routes::employee(id)).await?)
    }

    pub async fn create_employee(&self, payload: &CreateEmployee) -> Result<Option<Employee>> {
        self.session().require_admin()?;
        payload
            .validate()
            .map_err(|msg| ClientError::Rejected(msg.to_string()))?;

        let body: EmployeeBody = self.post(routes::EMPLOYEES, payload).await?;
        info!(email = %payload.email, "Employee created");
        Ok(body.employee)
    }

    pub async fn update_employee(
        &self,
        id: &str,
        payload: &UpdateEmployee,
    ) -> Result<Option<Employee>> {
        self.session().require_admin()?;
        if payload.is_empty() {
            return Err(ClientError::Rejected("Nothing to update".into()));
        }

        let body: EmployeeBody = self.put(&routes::employee(id), payload).await?;
        info!(employee_id = id, "Employee updated");
        Ok(body.employee)
    }

    /// The backend marks the employee as terminated.
    pub async fn delete_employee(&self, id: &str) -> Result<()> {
        self.session().require_admin()?;
        let _: Ack = self.delete(&routes::employee(id)).await?;
        info!(employee_id = id, "Employee deleted");
        Ok(())
    }

    pub async fn department_stats(&self) -> Result<Vec<DepartmentStat>> {
        self.session().require_admin()?;
        let body: DepartmentStatsBody = self.get(routes::DEPARTMENT_STATS).await?;
        Ok(body.stats)
    }
}

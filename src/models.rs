//! Sample record types: departments and users
//!
//! Both are ordinary caller-side types; they show how a record registers
//! its columns and accessors, and back the `sheetbind` CLI.

use crate::error::{SheetError, SheetResult};
use crate::record::{PropertyAccess, SheetRecord, Value};
use crate::types::{ColumnSpec, FieldDef, FieldKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

//==============================================================================
// Department
//==============================================================================

/// A department in the organisation tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dept {
    pub dept_id: Option<i64>,
    pub parent_id: Option<i64>,
    /// Comma-separated ids of all ancestors
    pub ancestors: String,
    pub dept_name: String,
    pub order_num: Option<i32>,
    pub leader: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// "0" normal, "1" disabled
    pub status: String,
    pub create_time: Option<NaiveDateTime>,
    pub remark: Option<String>,
}

impl PropertyAccess for Dept {
    fn property(&self, name: &str) -> Option<Value> {
        let value: Value = match name {
            "dept_id" => self.dept_id.into(),
            "parent_id" => self.parent_id.into(),
            "ancestors" => self.ancestors.clone().into(),
            "dept_name" => self.dept_name.clone().into(),
            "order_num" => self.order_num.into(),
            "leader" => self.leader.clone().into(),
            "phone" => self.phone.clone().into(),
            "email" => self.email.clone().into(),
            "status" => self.status.clone().into(),
            "create_time" => self.create_time.into(),
            "remark" => self.remark.clone().into(),
            _ => return None,
        };
        Some(value)
    }

    fn label(&self) -> String {
        self.dept_name.clone()
    }
}

impl SheetRecord for Dept {
    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::column("dept_id", FieldKind::Long, ColumnSpec::new("Dept ID")),
            FieldDef::column("parent_id", FieldKind::Long, ColumnSpec::new("Parent ID")),
            FieldDef::plain("ancestors", FieldKind::Text),
            FieldDef::column(
                "dept_name",
                FieldKind::Text,
                ColumnSpec::new("Dept Name").width(24.0),
            ),
            FieldDef::column("order_num", FieldKind::Int, ColumnSpec::new("Order")),
            FieldDef::column("leader", FieldKind::Text, ColumnSpec::new("Leader")),
            FieldDef::column("phone", FieldKind::Text, ColumnSpec::new("Phone")),
            FieldDef::column(
                "email",
                FieldKind::Text,
                ColumnSpec::new("Email").width(28.0),
            ),
            FieldDef::column(
                "status",
                FieldKind::Text,
                ColumnSpec::new("Status")
                    .combo(["0", "1"])
                    .prompt("0 = normal, 1 = disabled"),
            ),
            FieldDef::column(
                "create_time",
                FieldKind::DateTime,
                ColumnSpec::new("Created")
                    .width(20.0)
                    .date_format("yyyy-MM-dd HH:mm:ss"),
            ),
            FieldDef::column(
                "remark",
                FieldKind::Text,
                ColumnSpec::new("注：disabled departments are hidden").import_only(),
            ),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> SheetResult<()> {
        match field {
            "dept_id" => self.dept_id = value.take()?,
            "parent_id" => self.parent_id = value.take()?,
            "ancestors" => self.ancestors = value.take()?,
            "dept_name" => self.dept_name = value.take()?,
            "order_num" => self.order_num = value.take()?,
            "leader" => self.leader = value.take()?,
            "phone" => self.phone = value.take()?,
            "email" => self.email = value.take()?,
            "status" => self.status = value.take()?,
            "create_time" => self.create_time = value.take()?,
            "remark" => self.remark = value.take()?,
            other => return Err(unknown_field("Dept", other)),
        }
        Ok(())
    }
}

//==============================================================================
// User
//==============================================================================

/// A user account, exported with the name of its department
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub user_id: Option<i64>,
    pub login_name: String,
    pub user_name: String,
    pub email: Option<String>,
    pub phonenumber: Option<String>,
    /// "0" male, "1" female, "2" unknown
    pub sex: String,
    /// Account balance, kept exactly as typed
    pub balance: Option<String>,
    pub status: String,
    pub login_date: Option<NaiveDateTime>,
    pub dept: Option<Dept>,
}

impl PropertyAccess for User {
    fn property(&self, name: &str) -> Option<Value> {
        let value: Value = match name {
            "user_id" => self.user_id.into(),
            "login_name" => self.login_name.clone().into(),
            "user_name" => self.user_name.clone().into(),
            "email" => self.email.clone().into(),
            "phonenumber" => self.phonenumber.clone().into(),
            "sex" => self.sex.clone().into(),
            "balance" => self.balance.clone().map(Value::Decimal).unwrap_or(Value::Null),
            "status" => self.status.clone().into(),
            "login_date" => self.login_date.into(),
            "dept" => self.dept.clone().map(Value::object).unwrap_or(Value::Null),
            _ => return None,
        };
        Some(value)
    }

    fn label(&self) -> String {
        self.login_name.clone()
    }
}

impl SheetRecord for User {
    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::column("user_id", FieldKind::Long, ColumnSpec::new("User ID")),
            FieldDef::column("login_name", FieldKind::Text, ColumnSpec::new("Login")),
            FieldDef::column("user_name", FieldKind::Text, ColumnSpec::new("Name")),
            FieldDef::column("email", FieldKind::Text, ColumnSpec::new("Email").width(28.0)),
            FieldDef::column("phonenumber", FieldKind::Text, ColumnSpec::new("Phone")),
            FieldDef::column(
                "sex",
                FieldKind::Text,
                ColumnSpec::new("Sex").read_converter_exp("0=male,1=female,2=unknown"),
            ),
            FieldDef::column("balance", FieldKind::Decimal, ColumnSpec::new("Balance")),
            FieldDef::column(
                "status",
                FieldKind::Text,
                ColumnSpec::new("Status").read_converter_exp("0=normal,1=disabled"),
            ),
            FieldDef::column(
                "login_date",
                FieldKind::DateTime,
                ColumnSpec::new("Last Login").date_format("yyyy-MM-dd"),
            ),
            FieldDef::column(
                "dept",
                FieldKind::Object,
                ColumnSpec::new("Dept")
                    .target_attr("dept_name")
                    .default_value("-"),
            ),
        ]
    }

    fn assign(&mut self, field: &str, value: Value) -> SheetResult<()> {
        match field {
            "user_id" => self.user_id = value.take()?,
            "login_name" => self.login_name = value.take()?,
            "user_name" => self.user_name = value.take()?,
            "email" => self.email = value.take()?,
            "phonenumber" => self.phonenumber = value.take()?,
            "sex" => self.sex = value.take()?,
            "balance" => self.balance = value.take()?,
            "status" => self.status = value.take()?,
            "login_date" => self.login_date = value.take()?,
            other => return Err(unknown_field("User", other)),
        }
        Ok(())
    }
}

fn unknown_field(record: &str, field: &str) -> SheetError {
    SheetError::Configuration(format!("{} has no assignable field '{}'", record, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::discover;
    use crate::resolver::resolve;

    fn research() -> Dept {
        Dept {
            dept_id: Some(103),
            parent_id: Some(101),
            ancestors: "0,100,101".to_string(),
            dept_name: "Research".to_string(),
            status: "0".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_dept_columns_follow_declaration_order() {
        let columns = discover::<Dept>().unwrap();
        let fields: Vec<&str> = columns.iter().map(|c| c.field).collect();
        assert_eq!(
            fields,
            vec![
                "dept_id",
                "parent_id",
                "dept_name",
                "order_num",
                "leader",
                "phone",
                "email",
                "status",
                "create_time",
                "remark"
            ]
        );
        assert!(!columns[9].is_exportable);
    }

    #[test]
    fn test_dept_assign_rejects_unknown_field() {
        let mut dept = Dept::default();
        assert!(dept.assign("budget", Value::Long(1)).is_err());
    }

    #[test]
    fn test_user_dept_name_through_nested_path() {
        let columns = discover::<User>().unwrap();
        let dept_col = columns.iter().find(|c| c.field == "dept").unwrap();

        let mut user = User {
            dept: Some(research()),
            ..Default::default()
        };
        assert_eq!(resolve(&user, dept_col).unwrap(), "Research");

        user.dept = None;
        assert_eq!(resolve(&user, dept_col).unwrap(), "-");
    }

    #[test]
    fn test_user_sex_translation() {
        let columns = discover::<User>().unwrap();
        let sex = columns.iter().find(|c| c.field == "sex").unwrap();
        let user = User {
            sex: "1".to_string(),
            ..Default::default()
        };
        assert_eq!(resolve(&user, sex).unwrap(), "female");
    }
}

use connectors::{memory::MemoryQuery, query::FromRow, sql::base::error::DbError};
use model::{
    core::value::{FieldValue, Value},
    records::{
        entity::{Accessor, Entity, Field},
        row::RowData,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    Name,
}

impl Field for UserField {
    const ALL: &'static [Self] = &[UserField::Id, UserField::Name];

    fn name(self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Name => "name",
        }
    }
}

impl Entity for User {
    type Field = UserField;

    fn accessor(field: UserField) -> Accessor<Self> {
        match field {
            UserField::Id => |u| Value::Int(u.id),
            UserField::Name => |u| Value::String(u.name.clone()),
        }
    }
}

impl FromRow for User {
    fn from_row(row: RowData) -> Result<Self, DbError> {
        let id = row
            .get_value("id")
            .as_i64()
            .ok_or_else(|| DbError::Decode("users.id".into()))?;
        let name = row
            .get_value("name")
            .as_str()
            .map(String::from)
            .ok_or_else(|| DbError::Decode("users.name".into()))?;
        Ok(User { id, name })
    }
}

pub fn users(rows: &[(i64, &str)]) -> MemoryQuery<User> {
    MemoryQuery::new(
        "u",
        rows.iter()
            .map(|(id, name)| {
                RowData::new(
                    "users",
                    vec![FieldValue::new("id", *id), FieldValue::new("name", *name)],
                )
            })
            .collect(),
    )
}

/// Six users whose names repeat, so ordering by name needs the id tie-break.
pub fn six_users() -> MemoryQuery<User> {
    users(&[
        (1, "a"),
        (2, "b"),
        (3, "a"),
        (4, "c"),
        (5, "b"),
        (6, "c"),
    ])
}

pub fn ids(nodes: &[User]) -> Vec<i64> {
    nodes.iter().map(|u| u.id).collect()
}

/// Stores its `handle` field in a column named `login`, so paginating it
/// needs a column override.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub handle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    Id,
    Handle,
}

impl Field for AccountField {
    const ALL: &'static [Self] = &[AccountField::Id, AccountField::Handle];

    fn name(self) -> &'static str {
        match self {
            AccountField::Id => "id",
            AccountField::Handle => "handle",
        }
    }
}

impl Entity for Account {
    type Field = AccountField;

    fn accessor(field: AccountField) -> Accessor<Self> {
        match field {
            AccountField::Id => |a| Value::Int(a.id),
            AccountField::Handle => |a| Value::String(a.handle.clone()),
        }
    }
}

impl FromRow for Account {
    fn from_row(row: RowData) -> Result<Self, DbError> {
        let id = row
            .get_value("id")
            .as_i64()
            .ok_or_else(|| DbError::Decode("accounts.id".into()))?;
        let handle = row
            .get_value("login")
            .as_str()
            .map(String::from)
            .ok_or_else(|| DbError::Decode("accounts.login".into()))?;
        Ok(Account { id, handle })
    }
}

/// Handles `ava, ava, mia, mia, zoe` by (login, id): ids 2, 5, 1, 3, 4.
pub fn accounts() -> MemoryQuery<Account> {
    let rows = [(1, "mia"), (2, "ava"), (3, "mia"), (4, "zoe"), (5, "ava")];
    MemoryQuery::new(
        "a",
        rows.iter()
            .map(|(id, login)| {
                RowData::new(
                    "accounts",
                    vec![FieldValue::new("id", *id), FieldValue::new("login", *login)],
                )
            })
            .collect(),
    )
}

pub fn account_ids(nodes: &[Account]) -> Vec<i64> {
    nodes.iter().map(|a| a.id).collect()
}

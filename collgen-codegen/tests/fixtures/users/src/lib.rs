//! Golden test fixture: a record with a plain field and a pointer field.

pub struct User {
    pub id: i64,
    pub manager: Box<User>,
}

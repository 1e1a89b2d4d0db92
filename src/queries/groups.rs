use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    models::groups::{GroupFacts, NewGroup},
    store::StoreError,
};

// Correlated sub-lookups: one membership flag and one invitation check per
// group row, both keyed by ($1 = user id).
const GROUP_FACTS_SELECT: &str = r#"
SELECT g.id,
    g.title,
    g.description,
    g.owner_id,
    g.creation_date,
    (
        SELECT m.is_accepted
        FROM group_members m
        WHERE m.group_id = g.id
            AND m.user_id = $1
    ) AS membership,
    EXISTS (
        SELECT 1
        FROM group_invitation i
        WHERE i.group_id = g.id
            AND i.user_id = $1
    ) AS invited
FROM groups g
"#;

pub async fn insert_group(conn: &mut PgConnection, group: &NewGroup) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO groups (id, owner_id, title, description, creation_date) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(group.id)
    .bind(group.owner_id)
    .bind(&group.title)
    .bind(&group.description)
    .bind(group.creation_date)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_group_facts(
    conn: &mut PgConnection,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<Option<GroupFacts>, StoreError> {
    let sql = format!("{GROUP_FACTS_SELECT} WHERE g.id = $2");
    let facts = sqlx::query_as::<_, GroupFacts>(&sql)
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(conn)
        .await?;

    Ok(facts)
}

pub async fn get_all_group_facts(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> Result<Vec<GroupFacts>, StoreError> {
    let sql = format!("{GROUP_FACTS_SELECT} ORDER BY g.creation_date, g.id");
    let groups = sqlx::query_as::<_, GroupFacts>(&sql)
        .bind(user_id)
        .fetch_all(conn)
        .await?;

    Ok(groups)
}

pub async fn insert_group_member(
    conn: &mut PgConnection,
    group_id: Uuid,
    user_id: Uuid,
    accepted: bool,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO group_members (group_id, user_id, is_accepted) VALUES ($1, $2, $3)")
        .bind(group_id)
        .bind(user_id)
        .bind(accepted)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn delete_group_member(
    conn: &mut PgConnection,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
        .bind(group_id)
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn insert_group_invitation(
    conn: &mut PgConnection,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO group_invitation (group_id, user_id) VALUES ($1, $2)")
        .bind(group_id)
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

use sqlx::PgPool;

pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users_tb (
    user_id             BIGSERIAL PRIMARY KEY,
    name                TEXT NOT NULL,
    email               TEXT NOT NULL,
    password_digest     TEXT NOT NULL,
    role                SMALLINT NOT NULL DEFAULT 0,
    purchased_book_ids  JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT users_tb_email_key UNIQUE (email)
)
"#;

pub const CREATE_BOOKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS books_tb (
    book_id      BIGSERIAL PRIMARY KEY,
    name         TEXT NOT NULL,
    category     TEXT NOT NULL,
    price        NUMERIC(12, 2) NOT NULL CHECK (price >= 0),
    description  TEXT,
    author_id    BIGINT NOT NULL REFERENCES users_tb (user_id),
    image_url    TEXT,
    book_url     TEXT,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_BOOKS_AUTHOR_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS books_tb_author_idx ON books_tb (author_id)";

/// Create tables and indexes if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing PostgreSQL schema...");

    for statement in [
        CREATE_USERS_TABLE,
        CREATE_BOOKS_TABLE,
        CREATE_BOOKS_AUTHOR_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("PostgreSQL schema initialized");
    Ok(())
}

use crate::{
    config::DbConfig,
    data::{
        AttendanceStore,
        attendance::{AttendanceEvent, AttendanceLog},
        student::{NewStudent, Student},
    },
    error::{
        GetDatabaseConnectionSnafu, InvalidStoredTimestampSnafu, InvalidTimestampSnafu,
        MakeQuerySnafu, MigrateSnafu, OpenDatabaseSnafu, RollcallResult,
    },
};
use async_trait::async_trait;
use jiff::Timestamp;
use secrecy::ExposeSecret;
use snafu::ResultExt;
use sqlx::{Pool, Postgres, pool::PoolConnection, postgres::PgPoolOptions};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: Uuid,
    student_id: Uuid,
    timestamp: OffsetDateTime,
}

#[derive(sqlx::FromRow)]
struct JoinedAttendanceRow {
    id: Uuid,
    student_id: Uuid,
    timestamp: OffsetDateTime,
    s_id: Option<Uuid>,
    s_name: Option<String>,
    s_roll_number: Option<String>,
    s_fingerprint_id: Option<String>,
}

fn to_offset_date_time(timestamp: Timestamp) -> RollcallResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(timestamp.as_nanosecond())
        .context(InvalidTimestampSnafu { timestamp })
}

fn from_offset_date_time(odt: OffsetDateTime) -> RollcallResult<Timestamp> {
    Timestamp::from_nanosecond(odt.unix_timestamp_nanos())
        .context(InvalidStoredTimestampSnafu { odt })
}

impl TryFrom<AttendanceRow> for AttendanceEvent {
    type Error = crate::error::RollcallError;

    fn try_from(
        AttendanceRow {
            id,
            student_id,
            timestamp,
        }: AttendanceRow,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            student_id,
            timestamp: from_offset_date_time(timestamp)?,
        })
    }
}

impl TryFrom<JoinedAttendanceRow> for AttendanceLog {
    type Error = crate::error::RollcallError;

    fn try_from(row: JoinedAttendanceRow) -> Result<Self, Self::Error> {
        let student = match (row.s_id, row.s_name, row.s_roll_number, row.s_fingerprint_id) {
            (Some(id), Some(name), Some(roll_number), Some(fingerprint_id)) => Some(Student {
                id,
                name,
                roll_number,
                fingerprint_id,
            }),
            _ => None,
        };

        Ok(Self {
            event: AttendanceEvent {
                id: row.id,
                student_id: row.student_id,
                timestamp: from_offset_date_time(row.timestamp)?,
            },
            student,
        })
    }
}

impl PostgresStore {
    /// Builds the pool without touching the network; connections are made on first use.
    pub fn connect_lazy(db_config: &DbConfig) -> RollcallResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .connect_lazy(db_config.url().expose_secret())
            .context(OpenDatabaseSnafu)?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> RollcallResult<()> {
        sqlx::migrate!().run(&self.pool).await.context(MigrateSnafu)
    }

    async fn get_connection(&self) -> RollcallResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .context(GetDatabaseConnectionSnafu)
    }
}

#[async_trait]
impl AttendanceStore for PostgresStore {
    async fn insert_student(&self, to_be_added: NewStudent) -> RollcallResult<Student> {
        let NewStudent {
            name,
            roll_number,
            fingerprint_id,
        } = to_be_added;
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, Student>("INSERT INTO public.students (name, roll_number, fingerprint_id) VALUES ($1, $2, $3) RETURNING id, name, roll_number, fingerprint_id")
            .bind(name)
            .bind(roll_number)
            .bind(fingerprint_id)
            .fetch_one(&mut *conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn find_student_by_fingerprint(
        &self,
        fingerprint_id: &str,
    ) -> RollcallResult<Option<Student>> {
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, Student>(
            "SELECT id, name, roll_number, fingerprint_id FROM public.students WHERE fingerprint_id = $1 LIMIT 1",
        )
        .bind(fingerprint_id)
        .fetch_optional(&mut *conn)
        .await
        .context(MakeQuerySnafu)
    }

    async fn get_all_students(&self) -> RollcallResult<Vec<Student>> {
        sqlx::query_as::<_, Student>(
            "SELECT id, name, roll_number, fingerprint_id FROM public.students ORDER BY roll_number, id",
        )
        .fetch_all(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }

    async fn insert_attendance(
        &self,
        student_id: Uuid,
        timestamp: Timestamp,
    ) -> RollcallResult<AttendanceEvent> {
        let timestamp = to_offset_date_time(timestamp)?;
        let mut conn = self.get_connection().await?;

        sqlx::query_as::<_, AttendanceRow>("INSERT INTO public.attendance (student_id, \"timestamp\") VALUES ($1, $2) RETURNING id, student_id, \"timestamp\"")
            .bind(student_id)
            .bind(timestamp)
            .fetch_one(&mut *conn)
            .await
            .context(MakeQuerySnafu)?
            .try_into()
    }

    async fn get_attendance_between(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> RollcallResult<Vec<AttendanceLog>> {
        let start = to_offset_date_time(start)?;
        let end = to_offset_date_time(end)?;
        let mut conn = self.get_connection().await?;

        //left join so that events pointing at a missing student still come back
        sqlx::query_as::<_, JoinedAttendanceRow>(
            "SELECT a.id, a.student_id, a.\"timestamp\", s.id AS s_id, s.name AS s_name, s.roll_number AS s_roll_number, s.fingerprint_id AS s_fingerprint_id \
             FROM public.attendance a LEFT JOIN public.students s ON s.id = a.student_id \
             WHERE a.\"timestamp\" BETWEEN $1 AND $2 \
             ORDER BY a.\"timestamp\", a.id",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&mut *conn)
        .await
        .context(MakeQuerySnafu)?
        .into_iter()
        .map(AttendanceLog::try_from)
        .collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

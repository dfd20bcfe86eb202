use std::path::PathBuf;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{OptionalExtension, Row, params};

use super::{Db, StorageError};
use crate::common::models::VideoQuality;
use crate::task::models::{Task, TaskStatus};

const TASK_COLUMNS: &str =
    "id, bvid, cid, format, title, owner, cover, status, folder, audio, video, duration, create_at";

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

impl ToSql for VideoQuality {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(Value::Integer(i64::from(self.code()))))
    }
}

impl FromSql for VideoQuality {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = i32::column_result(value)?;
        VideoQuality::try_from(code).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        bvid: row.get(1)?,
        cid: row.get(2)?,
        format: row.get(3)?,
        title: row.get(4)?,
        owner: row.get(5)?,
        cover: row.get(6)?,
        status: row.get(7)?,
        folder: PathBuf::from(row.get::<_, String>(8)?),
        audio: row.get(9)?,
        video: row.get(10)?,
        duration: row.get(11)?,
        create_at: row.get(12)?,
    })
}

impl Db {
    /// 写入新任务，忽略 `task.id`，返回数据库分配的 ID
    pub fn create_task(&self, task: &Task) -> Result<i64, StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO task (bvid, cid, format, title, owner, cover, status, folder, audio, video, duration, create_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    task.bvid,
                    task.cid,
                    task.format,
                    task.title,
                    task.owner,
                    task.cover,
                    task.status,
                    task.folder.to_string_lossy().into_owned(),
                    task.audio,
                    task.video,
                    task.duration,
                    task.create_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>, StorageError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM task WHERE id = ?1", TASK_COLUMNS),
                [id],
                task_from_row,
            )
            .optional()
        })
    }

    /// 删除不存在的记录不算错误
    pub fn delete_task(&self, id: i64) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM task WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    /// 分页列出任务，新任务在前；`page` 从 0 开始
    pub fn list_tasks(&self, page: u32, page_size: u32) -> Result<Vec<Task>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM task ORDER BY id DESC LIMIT ?1 OFFSET ?2",
                TASK_COLUMNS
            ))?;
            let offset = i64::from(page) * i64::from(page_size);
            let list = stmt
                .query_map(params![i64::from(page_size), offset], task_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(list)
        })
    }

    pub fn update_status(&self, id: i64, status: TaskStatus) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute("UPDATE task SET status = ?1 WHERE id = ?2", params![status, id])?;
            Ok(())
        })
    }
}

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use crate::entity::prelude::{ClassSchedules, ClassSessions};
use crate::entity::{class_schedules, class_sessions};
use crate::errors::Result;
use crate::models::courses::entities::{ClassSchedule, ClassSession};

impl SeaOrmStorage {
    pub async fn list_schedules_impl(
        &self,
        course_id: Option<i64>,
        teacher_id: Option<i64>,
    ) -> Result<Vec<ClassSchedule>> {
        let mut select = ClassSchedules::find();
        if let Some(course_id) = course_id {
            select = select.filter(class_schedules::Column::CourseId.eq(course_id));
        }
        if let Some(teacher_id) = teacher_id {
            select = select.filter(class_schedules::Column::TeacherId.eq(teacher_id));
        }
        let models = select
            .order_by_asc(class_schedules::Column::BatchStartDate)
            .order_by_asc(class_schedules::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_schedule()).collect())
    }

    pub async fn list_sessions_for_schedules_impl(
        &self,
        schedule_ids: &[i64],
    ) -> Result<Vec<ClassSession>> {
        if schedule_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ClassSessions::find()
            .filter(class_sessions::Column::ScheduleId.is_in(schedule_ids.iter().copied()))
            .order_by_asc(class_sessions::Column::SessionDate)
            .order_by_asc(class_sessions::Column::StartTime)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_session()).collect())
    }
}

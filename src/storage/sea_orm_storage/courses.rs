use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::SeaOrmStorage;
use crate::entity::prelude::{CourseActiveModel, Courses};
use crate::entity::{course_pricing, courses};
use crate::errors::{PlatformError, Result};
use crate::models::courses::{
    entities::{Course, CoursePricing},
    requests::{NewCourse, UpdateCourseRequest},
};

impl SeaOrmStorage {
    pub async fn list_courses_impl(&self, active_only: bool) -> Result<Vec<Course>> {
        let mut select = Courses::find();
        if active_only {
            select = select.filter(courses::Column::IsActive.eq(true));
        }
        let models = select
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PlatformError::database_operation(format!("查询课程失败: {e}")))?;
        Ok(models.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        Ok(Courses::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|m| m.into_course()))
    }

    pub async fn course_name_exists_impl(&self, name: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut select = Courses::find().filter(courses::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            select = select.filter(courses::Column::Id.ne(id));
        }
        Ok(select.count(&self.db).await? > 0)
    }

    pub async fn course_slug_exists_impl(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut select = Courses::find().filter(courses::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            select = select.filter(courses::Column::Id.ne(id));
        }
        Ok(select.count(&self.db).await? > 0)
    }

    pub async fn create_course_impl(&self, course: NewCourse) -> Result<Course> {
        let now = Utc::now().timestamp();
        let model = courses::ActiveModel {
            name: Set(course.name),
            slug: Set(course.slug),
            description: Set(course.description),
            category: Set(course.category),
            level: Set(course.level.as_str().to_string()),
            thumbnail: Set(course.thumbnail),
            duration_hours: Set(course.duration_hours),
            base_price: Set(course.base_price),
            advantages: Set(serde_json::to_string(&course.advantages)?),
            is_active: Set(course.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| PlatformError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(model.into_course())
    }

    /// 部分更新，`slug` 应已由调用方解析
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let Some(model) = Courses::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: CourseActiveModel = model.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(slug) = update.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(category) = update.category {
            active.category = Set(category);
        }
        if let Some(level) = update.level {
            active.level = Set(level.as_str().to_string());
        }
        if let Some(thumbnail) = update.thumbnail {
            active.thumbnail = Set(Some(thumbnail));
        }
        if let Some(hours) = update.duration_hours {
            active.duration_hours = Set(hours);
        }
        if let Some(price) = update.base_price {
            active.base_price = Set(price);
        }
        if let Some(advantages) = update.advantages {
            active.advantages = Set(serde_json::to_string(&advantages)?);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| PlatformError::database_operation(format!("更新课程失败: {e}")))?;
        Ok(Some(updated.into_course()))
    }

    pub async fn create_course_pricing_impl(
        &self,
        course_id: i64,
        original_price: i64,
        discount_percent: i32,
        final_price: i64,
    ) -> Result<CoursePricing> {
        let model = course_pricing::ActiveModel {
            course_id: Set(course_id),
            original_price: Set(original_price),
            discount_percent: Set(discount_percent),
            final_price: Set(final_price),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model.into_pricing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::new_course;

    #[actix_web::test]
    async fn test_course_crud() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let course = storage.create_course_impl(new_course("Rust Basics")).await.unwrap();
        assert_eq!(course.slug, "rust-basics");
        assert_eq!(course.advantages, vec!["Live classes".to_string()]);

        assert!(storage.course_name_exists_impl("Rust Basics", None).await.unwrap());
        assert!(
            !storage
                .course_name_exists_impl("Rust Basics", Some(course.id))
                .await
                .unwrap()
        );

        let updated = storage
            .update_course_impl(
                course.id,
                UpdateCourseRequest {
                    is_active: Some(false),
                    base_price: Some(199_900),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.base_price, 199_900);
        assert_eq!(updated.name, "Rust Basics");

        assert!(storage.list_courses_impl(true).await.unwrap().is_empty());
        assert_eq!(storage.list_courses_impl(false).await.unwrap().len(), 1);
        assert!(
            storage
                .update_course_impl(999, UpdateCourseRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_pricing_requires_course() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let course = storage.create_course_impl(new_course("Go Basics")).await.unwrap();
        let pricing = storage
            .create_course_pricing_impl(course.id, 100_000, 10, 90_000)
            .await
            .unwrap();
        assert_eq!(pricing.final_price, 90_000);

        assert!(
            storage
                .create_course_pricing_impl(404, 100_000, 10, 90_000)
                .await
                .is_err()
        );
    }
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::SeaOrmStorage;
use crate::entity::prelude::{
    CourseEnrollmentActiveModel, CourseEnrollments, CourseSubscriptionActiveModel,
    CourseSubscriptions,
};
use crate::entity::{course_enrollments, course_subscriptions};
use crate::errors::{PlatformError, Result};
use crate::models::payments::entities::{
    Enrollment, NewSubscription, PaymentRecordFilter, PaymentStatus, Subscription,
};
use crate::scheduling::BatchKind;

impl SeaOrmStorage {
    async fn subscription_model(&self, id: i64) -> Result<crate::entity::prelude::CourseSubscriptionModel> {
        CourseSubscriptions::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlatformError::not_found(format!("Subscription {id} not found.")))
    }

    pub async fn get_subscription_impl(&self, id: i64) -> Result<Option<Subscription>> {
        Ok(CourseSubscriptions::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|m| m.into_subscription()))
    }

    pub async fn find_subscription_impl(
        &self,
        student_id: i64,
        course_id: i64,
        status: PaymentStatus,
    ) -> Result<Option<Subscription>> {
        let model = CourseSubscriptions::find()
            .filter(course_subscriptions::Column::StudentId.eq(student_id))
            .filter(course_subscriptions::Column::CourseId.eq(course_id))
            .filter(course_subscriptions::Column::PaymentStatus.eq(status.as_str()))
            .order_by_desc(course_subscriptions::Column::PurchasedAt)
            .order_by_desc(course_subscriptions::Column::Id)
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.into_subscription()))
    }

    pub async fn list_subscriptions_impl(
        &self,
        student_id: Option<i64>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Subscription>> {
        let mut select = CourseSubscriptions::find();
        if let Some(student_id) = student_id {
            select = select.filter(course_subscriptions::Column::StudentId.eq(student_id));
        }
        if let Some(status) = status {
            select = select.filter(course_subscriptions::Column::PaymentStatus.eq(status.as_str()));
        }
        let models = select
            .order_by_desc(course_subscriptions::Column::PurchasedAt)
            .order_by_desc(course_subscriptions::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_subscription()).collect())
    }

    pub async fn create_subscription_impl(&self, sub: NewSubscription) -> Result<Subscription> {
        let model = course_subscriptions::ActiveModel {
            student_id: Set(sub.student_id),
            course_id: Set(sub.course_id),
            amount_paid: Set(sub.amount_paid),
            currency: Set(sub.currency),
            order_id: Set(sub.order_id),
            payment_id: Set(None),
            payment_method: Set(sub.payment_method),
            payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
            payment_response: Set(None),
            is_active: Set(true),
            purchased_at: Set(Utc::now().timestamp()),
            payment_completed_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| PlatformError::database_operation(format!("创建订阅失败: {e}")))?;
        Ok(model.into_subscription())
    }

    pub async fn renew_subscription_order_impl(
        &self,
        id: i64,
        order_id: &str,
        amount: i64,
    ) -> Result<Subscription> {
        let mut active: CourseSubscriptionActiveModel = self.subscription_model(id).await?.into();
        active.order_id = Set(order_id.to_string());
        active.amount_paid = Set(amount);
        active.purchased_at = Set(Utc::now().timestamp());
        Ok(active.update(&self.db).await?.into_subscription())
    }

    /// 写入支付结果（完成或失败）
    pub async fn settle_subscription_impl(
        &self,
        id: i64,
        payment_id: &str,
        response: serde_json::Value,
        status: PaymentStatus,
    ) -> Result<Subscription> {
        let mut active: CourseSubscriptionActiveModel = self.subscription_model(id).await?.into();
        active.payment_id = Set(Some(payment_id.to_string()));
        active.payment_status = Set(status.as_str().to_string());
        active.payment_response = Set(Some(serde_json::to_string(&response)?));
        if status == PaymentStatus::Completed {
            active.payment_completed_at = Set(Some(Utc::now().timestamp()));
        }
        Ok(active.update(&self.db).await?.into_subscription())
    }

    pub async fn list_recent_subscriptions_impl(&self, limit: u64) -> Result<Vec<Subscription>> {
        let models = CourseSubscriptions::find()
            .order_by_desc(course_subscriptions::Column::PurchasedAt)
            .order_by_desc(course_subscriptions::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_subscription()).collect())
    }

    pub async fn list_payment_records_impl(
        &self,
        filter: PaymentRecordFilter,
        page: u64,
        size: u64,
    ) -> Result<(Vec<Subscription>, u64)> {
        let mut select = CourseSubscriptions::find();

        if let Some(from) = filter.completed_from {
            select = select
                .filter(course_subscriptions::Column::PaymentCompletedAt.gte(from.timestamp()));
        }
        if let Some(to) = filter.completed_to {
            select =
                select.filter(course_subscriptions::Column::PaymentCompletedAt.lte(to.timestamp()));
        }
        if let Some(course_ids) = filter.course_ids {
            select = select.filter(course_subscriptions::Column::CourseId.is_in(course_ids));
        }
        if let Some(status) = filter.status {
            select = select.filter(course_subscriptions::Column::PaymentStatus.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(course_subscriptions::Column::PaymentCompletedAt)
            .order_by_desc(course_subscriptions::Column::Id)
            .paginate(&self.db, size.max(1));
        let total = paginator
            .num_items()
            .await
            .map_err(|e| PlatformError::database_operation(format!("查询支付记录总数失败: {e}")))?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| PlatformError::database_operation(format!("查询支付记录失败: {e}")))?;

        Ok((rows.into_iter().map(|m| m.into_subscription()).collect(), total))
    }

    pub async fn upsert_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
        subscription_id: i64,
        batch: BatchKind,
    ) -> Result<Enrollment> {
        let existing = CourseEnrollments::find()
            .filter(course_enrollments::Column::SubscriptionId.eq(subscription_id))
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut active: CourseEnrollmentActiveModel = model.into();
                active.batch = Set(batch.to_string());
                active.update(&self.db).await?
            }
            None => {
                course_enrollments::ActiveModel {
                    student_id: Set(student_id),
                    course_id: Set(course_id),
                    subscription_id: Set(subscription_id),
                    batch: Set(batch.to_string()),
                    enrolled_at: Set(Utc::now().timestamp()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            }
        };
        Ok(model.into_enrollment())
    }

    pub async fn get_enrollment_by_subscription_impl(
        &self,
        subscription_id: i64,
    ) -> Result<Option<Enrollment>> {
        Ok(CourseEnrollments::find()
            .filter(course_enrollments::Column::SubscriptionId.eq(subscription_id))
            .one(&self.db)
            .await?
            .map(|m| m.into_enrollment()))
    }

    pub async fn update_enrollment_batch_impl(&self, id: i64, batch: BatchKind) -> Result<Enrollment> {
        let model = CourseEnrollments::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlatformError::not_found(format!("Enrollment {id} not found.")))?;

        let mut active: CourseEnrollmentActiveModel = model.into();
        active.batch = Set(batch.to_string());
        Ok(active.update(&self.db).await?.into_enrollment())
    }

    pub async fn list_enrollments_impl(&self, student_id: Option<i64>) -> Result<Vec<Enrollment>> {
        let mut select = CourseEnrollments::find();
        if let Some(student_id) = student_id {
            select = select.filter(course_enrollments::Column::StudentId.eq(student_id));
        }
        let models = select
            .order_by_asc(course_enrollments::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_enrollment()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{new_course, new_user};

    async fn seeded() -> (SeaOrmStorage, i64, i64) {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = storage
            .create_user_impl(new_user("kiran", "kiran@example.com", "9111111111", UserRole::Student))
            .await
            .unwrap();
        let course = storage.create_course_impl(new_course("SQL")).await.unwrap();
        (storage, student.id, course.id)
    }

    fn new_subscription(student_id: i64, course_id: i64, order: &str) -> NewSubscription {
        NewSubscription {
            student_id,
            course_id,
            amount_paid: 250_000,
            currency: "INR".into(),
            order_id: order.into(),
            payment_method: "razorpay".into(),
        }
    }

    #[actix_web::test]
    async fn test_subscription_lifecycle() {
        let (storage, student_id, course_id) = seeded().await;
        let sub = storage
            .create_subscription_impl(new_subscription(student_id, course_id, "order_1"))
            .await
            .unwrap();
        assert_eq!(sub.payment_status, PaymentStatus::Pending);

        let renewed = storage
            .renew_subscription_order_impl(sub.id, "order_2", 199_900)
            .await
            .unwrap();
        assert_eq!(renewed.order_id, "order_2");
        assert_eq!(renewed.amount_paid, 199_900);

        let done = storage
            .settle_subscription_impl(
                sub.id,
                "pay_1",
                serde_json::json!({"razorpay_payment_id": "pay_1"}),
                PaymentStatus::Completed,
            )
            .await
            .unwrap();
        assert_eq!(done.payment_status, PaymentStatus::Completed);
        assert!(done.payment_completed_at.is_some());
        assert_eq!(done.payment_response.unwrap()["razorpay_payment_id"], "pay_1");

        let found = storage
            .find_subscription_impl(student_id, course_id, PaymentStatus::Completed)
            .await
            .unwrap();
        assert_eq!(found.map(|s| s.id), Some(sub.id));
    }

    #[actix_web::test]
    async fn test_enrollment_upsert_keeps_single_row() {
        let (storage, student_id, course_id) = seeded().await;
        let sub = storage
            .create_subscription_impl(new_subscription(student_id, course_id, "order_1"))
            .await
            .unwrap();

        let first = storage
            .upsert_enrollment_impl(student_id, course_id, sub.id, BatchKind::Weekdays)
            .await
            .unwrap();
        let second = storage
            .upsert_enrollment_impl(student_id, course_id, sub.id, BatchKind::Weekends)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.batch, BatchKind::Weekends);
        assert_eq!(storage.list_enrollments_impl(Some(student_id)).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_payment_records_filter_and_paging() {
        let (storage, student_id, course_id) = seeded().await;
        for i in 0..3 {
            let sub = storage
                .create_subscription_impl(new_subscription(student_id, course_id, &format!("order_{i}")))
                .await
                .unwrap();
            if i < 2 {
                storage
                    .settle_subscription_impl(
                        sub.id,
                        &format!("pay_{i}"),
                        serde_json::Value::Null,
                        PaymentStatus::Completed,
                    )
                    .await
                    .unwrap();
            }
        }

        let filter = PaymentRecordFilter {
            status: Some(PaymentStatus::Completed),
            ..Default::default()
        };
        let (rows, total) = storage.list_payment_records_impl(filter, 1, 1).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 1);

        let filter = PaymentRecordFilter {
            course_ids: Some(vec![]),
            ..Default::default()
        };
        let (rows, total) = storage.list_payment_records_impl(filter, 1, 10).await.unwrap();
        assert_eq!((rows.len(), total), (0, 0));

        assert_eq!(storage.list_recent_subscriptions_impl(5).await.unwrap().len(), 3);
    }
}

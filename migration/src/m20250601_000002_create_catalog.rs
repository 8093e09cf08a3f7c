use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 课程表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Courses::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Courses::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::Category).string().not_null())
                    .col(ColumnDef::new(Courses::Level).string().not_null())
                    .col(ColumnDef::new(Courses::Thumbnail).string().null())
                    .col(ColumnDef::new(Courses::DurationHours).integer().not_null())
                    .col(ColumnDef::new(Courses::BasePrice).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Advantages).text().not_null())
                    .col(
                        ColumnDef::new(Courses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 课程定价表 ====================
        manager
            .create_table(
                Table::create()
                    .table(CoursePricing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoursePricing::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CoursePricing::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePricing::OriginalPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePricing::DiscountPercent)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePricing::FinalPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CoursePricing::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CoursePricing::Table, CoursePricing::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 班次排期表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ClassSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassSchedules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSchedules::Batch).string().not_null())
                    .col(
                        ColumnDef::new(ClassSchedules::BatchStartDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::BatchEndDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 课时表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ClassSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassSessions::ClassId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ClassSessions::ScheduleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSessions::SessionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSessions::StartTime).time().not_null())
                    .col(ColumnDef::new(ClassSessions::EndTime).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSessions::Table, ClassSessions::ScheduleId)
                            .to(ClassSchedules::Table, ClassSchedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 课程订阅表 ====================
        manager
            .create_table(
                Table::create()
                    .table(CourseSubscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseSubscriptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::AmountPaid)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::Currency)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::OrderId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::PaymentId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::PaymentStatus)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::PaymentResponse)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::PurchasedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseSubscriptions::PaymentCompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseSubscriptions::Table, CourseSubscriptions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseSubscriptions::Table, CourseSubscriptions::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 选课表 ====================
        manager
            .create_table(
                Table::create()
                    .table(CourseEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseEnrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseEnrollments::SubscriptionId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CourseEnrollments::Batch).string().not_null())
                    .col(
                        ColumnDef::new(CourseEnrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseEnrollments::Table, CourseEnrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseEnrollments::Table, CourseEnrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                CourseEnrollments::Table,
                                CourseEnrollments::SubscriptionId,
                            )
                            .to(CourseSubscriptions::Table, CourseSubscriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_schedules_teacher_id")
                    .table(ClassSchedules::Table)
                    .col(ClassSchedules::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_schedules_course_id")
                    .table(ClassSchedules::Table)
                    .col(ClassSchedules::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_sessions_schedule_date")
                    .table(ClassSessions::Table)
                    .col(ClassSessions::ScheduleId)
                    .col(ClassSessions::SessionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_subscriptions_student_course")
                    .table(CourseSubscriptions::Table)
                    .col(CourseSubscriptions::StudentId)
                    .col(CourseSubscriptions::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(CourseEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseSubscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassSchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CoursePricing::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Name,
    Slug,
    Description,
    Category,
    Level,
    Thumbnail,
    DurationHours,
    BasePrice,
    Advantages,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CoursePricing {
    #[sea_orm(iden = "course_pricing")]
    Table,
    Id,
    CourseId,
    OriginalPrice,
    DiscountPercent,
    FinalPrice,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClassSchedules {
    #[sea_orm(iden = "class_schedules")]
    Table,
    Id,
    CourseId,
    TeacherId,
    Batch,
    BatchStartDate,
    BatchEndDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClassSessions {
    #[sea_orm(iden = "class_sessions")]
    Table,
    Id,
    ClassId,
    ScheduleId,
    SessionDate,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
enum CourseSubscriptions {
    #[sea_orm(iden = "course_subscriptions")]
    Table,
    Id,
    StudentId,
    CourseId,
    AmountPaid,
    Currency,
    OrderId,
    PaymentId,
    PaymentMethod,
    PaymentStatus,
    PaymentResponse,
    IsActive,
    PurchasedAt,
    PaymentCompletedAt,
}

#[derive(DeriveIden)]
enum CourseEnrollments {
    #[sea_orm(iden = "course_enrollments")]
    Table,
    Id,
    StudentId,
    CourseId,
    SubscriptionId,
    Batch,
    EnrolledAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::PhoneNumber)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::FirstName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Users::LastName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(
                        ColumnDef::new(Users::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::PhoneVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::TrialEndsAt).big_integer().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 教师资料表
        manager
            .create_table(
                Table::create()
                    .table(TeacherProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeacherProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TeacherProfiles::Qualification)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(TeacherProfiles::ExperienceYears)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TeacherProfiles::Specialization)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeacherProfiles::Bio).text().null())
                    .col(ColumnDef::new(TeacherProfiles::LinkedinUrl).string().null())
                    .col(
                        ColumnDef::new(TeacherProfiles::TeachingLanguages)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherProfiles::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TeacherProfiles::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherProfiles::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeacherProfiles::Table, TeacherProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生资料表
        manager
            .create_table(
                Table::create()
                    .table(StudentProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StudentProfiles::ProfilePicture)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentProfiles::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentProfiles::Table, StudentProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 一次性验证码表
        manager
            .create_table(
                Table::create()
                    .table(Otps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Otps::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Otps::Identifier).string().not_null())
                    .col(ColumnDef::new(Otps::Channel).string().not_null())
                    .col(ColumnDef::new(Otps::Purpose).string().not_null())
                    .col(ColumnDef::new(Otps::Code).string().not_null())
                    .col(
                        ColumnDef::new(Otps::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Otps::ExpiresAt).big_integer().not_null())
                    .col(ColumnDef::new(Otps::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_otps_lookup")
                    .table(Otps::Table)
                    .col(Otps::Identifier)
                    .col(Otps::Channel)
                    .col(Otps::Purpose)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Otps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PhoneNumber,
    PasswordHash,
    FirstName,
    LastName,
    Role,
    Status,
    EmailVerified,
    PhoneVerified,
    TrialEndsAt,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeacherProfiles {
    #[sea_orm(iden = "teacher_profiles")]
    Table,
    Id,
    UserId,
    Qualification,
    ExperienceYears,
    Specialization,
    Bio,
    LinkedinUrl,
    TeachingLanguages,
    IsVerified,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentProfiles {
    #[sea_orm(iden = "student_profiles")]
    Table,
    Id,
    UserId,
    ProfilePicture,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Otps {
    #[sea_orm(iden = "otps")]
    Table,
    Id,
    Identifier,
    Channel,
    Purpose,
    Code,
    IsVerified,
    ExpiresAt,
    CreatedAt,
}

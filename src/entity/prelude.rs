//! 预导入模块，方便使用

pub use super::class_schedules::{
    ActiveModel as ClassScheduleActiveModel, Entity as ClassSchedules,
    Model as ClassScheduleModel,
};
pub use super::class_sessions::{
    ActiveModel as ClassSessionActiveModel, Entity as ClassSessions, Model as ClassSessionModel,
};
pub use super::course_enrollments::{
    ActiveModel as CourseEnrollmentActiveModel, Entity as CourseEnrollments,
    Model as CourseEnrollmentModel,
};
pub use super::course_pricing::{
    ActiveModel as CoursePricingActiveModel, Entity as CoursePricing,
    Model as CoursePricingModel,
};
pub use super::course_subscriptions::{
    ActiveModel as CourseSubscriptionActiveModel, Entity as CourseSubscriptions,
    Model as CourseSubscriptionModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::otps::{ActiveModel as OtpActiveModel, Entity as Otps, Model as OtpModel};
pub use super::student_profiles::{
    ActiveModel as StudentProfileActiveModel, Entity as StudentProfiles,
    Model as StudentProfileModel,
};
pub use super::teacher_profiles::{
    ActiveModel as TeacherProfileActiveModel, Entity as TeacherProfiles,
    Model as TeacherProfileModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};

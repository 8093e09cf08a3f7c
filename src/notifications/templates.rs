//! 邮件与短信模板

use crate::models::otp::entities::OtpPurpose;
use crate::scheduling::ScheduleEntry;

use super::MailMessage;

/// 课程名及其排期摘要
#[derive(Debug, Clone)]
pub struct AssignedCourse {
    pub course_name: String,
    pub schedule: Vec<ScheduleEntry>,
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn html_layout(brand: &str, heading: &str, body: &str) -> String {
    let brand = escape_html(brand);
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background-color: #4CAF50; color: white; padding: 20px; text-align: center;"><h1>{brand}</h1></div>
  <div style="padding: 20px; background-color: #f9f9f9;">
    <h2>{heading}</h2>
{body}
  </div>
  <div style="background-color: #333; color: white; padding: 10px; text-align: center; font-size: 12px;">{brand}</div>
</div>"#
    )
}

pub fn otp_email(
    brand: &str,
    to: &str,
    code: &str,
    purpose: OtpPurpose,
    expiry_minutes: i64,
) -> MailMessage {
    let html_body = html_layout(
        brand,
        "Verification Code",
        &format!(
            r#"    <p>Hello,</p>
    <p>Your OTP verification code is:</p>
    <div style="background-color: #fff; padding: 20px; text-align: center; font-size: 32px; font-weight: bold; letter-spacing: 5px; border: 2px dashed #4CAF50;">{code}</div>
    <p style="color: #666;">This code will expire in {expiry_minutes} minutes.</p>
    <p style="color: #666;">Please do not share this code with anyone.</p>
    <p style="color: #999; font-size: 12px;">If you didn't request this code, please ignore this email.</p>"#,
            code = escape_html(code),
        ),
    );

    let text_body = format!(
        "Hello,\n\nYour OTP verification code is: {code}\n\n\
         This code will expire in {expiry_minutes} minutes. Please do not share this code with anyone.\n\n\
         If you didn't request this code, please ignore this email.\n\n\
         Best regards,\n{brand} Team\n"
    );

    MailMessage {
        to: to.to_string(),
        subject: purpose.email_subject().to_string(),
        text_body,
        html_body,
    }
}

pub fn otp_sms(brand: &str, code: &str, expiry_minutes: i64) -> String {
    format!("{code} is your {brand} verification code. It expires in {expiry_minutes} minutes.")
}

/// 排期的单行描述，例如 `weekdays: Monday, Tuesday | 09:00 AM to 10:00 AM | 2026-01-05 to 2026-02-27`
pub fn schedule_line(entry: &ScheduleEntry) -> String {
    format!(
        "{}: {} | {} | {} to {}",
        entry.kind,
        entry.days.join(", "),
        entry.time,
        entry.batch_start_date,
        entry.batch_end_date
    )
}

pub fn teacher_credentials_email(
    brand: &str,
    name: &str,
    email: &str,
    username: &str,
    password: &str,
    courses: &[AssignedCourse],
) -> MailMessage {
    let mut text_courses = String::new();
    let mut html_courses = String::new();
    for course in courses {
        text_courses.push_str(&format!("- {}\n", course.course_name));
        html_courses.push_str(&format!(
            "      <li><strong>{}</strong><ul>",
            escape_html(&course.course_name)
        ));
        for entry in &course.schedule {
            let line = schedule_line(entry);
            text_courses.push_str(&format!("    {line}\n"));
            html_courses.push_str(&format!("<li>{}</li>", escape_html(&line)));
        }
        html_courses.push_str("</ul></li>\n");
    }
    if courses.is_empty() {
        text_courses.push_str("No courses assigned yet.\n");
        html_courses.push_str("      <li>No courses assigned yet.</li>\n");
    }

    let html_body = html_layout(
        brand,
        &format!("Welcome to {}!", escape_html(brand)),
        &format!(
            r#"    <p>Hello {name},</p>
    <p>Your instructor account has been created. Sign in with the credentials below and change your password after the first login.</p>
    <div style="background-color: #fff; padding: 20px; border: 2px dashed #4CAF50;">
      <p><strong>Username:</strong> {username}</p>
      <p><strong>Email:</strong> {email}</p>
      <p><strong>Temporary password:</strong> {password}</p>
    </div>
    <h3>Assigned courses</h3>
    <ul>
{html_courses}    </ul>"#,
            name = escape_html(name),
            username = escape_html(username),
            email = escape_html(email),
            password = escape_html(password),
        ),
    );

    let text_body = format!(
        "Hello {name},\n\nYour instructor account has been created.\n\n\
         Username: {username}\nEmail: {email}\nTemporary password: {password}\n\n\
         Assigned courses:\n{text_courses}\nBest regards,\n{brand} Team\n"
    );

    MailMessage {
        to: email.to_string(),
        subject: format!("Your {brand} Instructor Account and Course Assignments"),
        text_body,
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::BatchKind;
    use chrono::NaiveDate;

    #[test]
    fn test_otp_email() {
        let mail = otp_email("Edu", "a@example.com", "0421", OtpPurpose::PasswordReset, 10);
        assert_eq!(mail.subject, "Your OTP for Password Reset");
        assert_eq!(mail.to, "a@example.com");
        assert!(mail.text_body.contains("Your OTP verification code is: 0421"));
        assert!(mail.text_body.contains("expire in 10 minutes"));
        assert!(mail.html_body.contains(">0421</div>"));

        let mail = otp_email("Edu", "a@example.com", "1234", OtpPurpose::Registration, 5);
        assert_eq!(mail.subject, "Your OTP for Registration");
        assert!(mail.html_body.contains("expire in 5 minutes"));
    }

    #[test]
    fn test_teacher_credentials_email() {
        let entry = ScheduleEntry {
            days: vec!["Saturday".into()],
            time: "10:00 AM to 12:00 PM".into(),
            kind: BatchKind::Weekends,
            batch_start_date: NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(),
            batch_end_date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        };
        let courses = vec![AssignedCourse {
            course_name: "C++ & Systems".into(),
            schedule: vec![entry],
        }];
        let mail = teacher_credentials_email(
            "Edu",
            "Meera Iyer",
            "meera@example.com",
            "meera_a1b2c3",
            "Xy7!pass",
            &courses,
        );
        assert!(mail.text_body.contains("Username: meera_a1b2c3"));
        assert!(mail.text_body.contains("Temporary password: Xy7!pass"));
        assert!(mail.text_body.contains(
            "weekends: Saturday | 10:00 AM to 12:00 PM | 2026-01-03 to 2026-02-28"
        ));
        assert!(mail.html_body.contains("C++ &amp; Systems"));
        assert!(!mail.html_body.contains("C++ & Systems"));
    }

    #[test]
    fn test_otp_sms() {
        assert_eq!(
            otp_sms("Edu", "9999", 10),
            "9999 is your Edu verification code. It expires in 10 minutes."
        );
    }
}

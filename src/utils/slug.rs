/// 由名称生成 URL slug：小写字母数字，其余字符折叠为单个 `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Python for Data Science"), "python-for-data-science");
        assert_eq!(slugify("  C++ & Rust!  "), "c-rust");
        assert_eq!(slugify("Full-Stack   Web"), "full-stack-web");
        assert_eq!(slugify("***"), "");
    }
}

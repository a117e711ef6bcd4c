//! Fixed-vocabulary skill detection.

/// Skill keywords matched as plain substrings of the lowercased resume text.
/// Short entries such as `r` and `go` match inside longer words; that is the
/// accepted behavior of the matcher.
pub const SKILL_VOCABULARY: &[&str] = &[
    // languages
    "python",
    "java",
    "javascript",
    "c++",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "go",
    "rust",
    "typescript",
    "vba",
    "visual basic",
    "r",
    "matlab",
    "scala",
    "perl",
    // web
    "html",
    "css",
    "react",
    "angular",
    "vue",
    "node.js",
    "express",
    "django",
    "flask",
    "spring",
    "asp.net",
    // databases
    "sql",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "oracle",
    "sqlite",
    "cassandra",
    "dynamodb",
    // cloud / devops
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "jenkins",
    "ci/cd",
    "terraform",
    "ansible",
    // data / ml
    "machine learning",
    "deep learning",
    "data analysis",
    "pandas",
    "numpy",
    "scikit-learn",
    "tensorflow",
    "pytorch",
    "keras",
    "statistics",
    "data visualization",
    "tableau",
    "power bi",
    // mobile
    "android",
    "ios",
    "react native",
    "flutter",
    "mobile development",
    // office
    "excel",
    "macros",
    "power query",
    "power pivot",
    "access",
    "word",
    "powerpoint",
    // practices
    "git",
    "agile",
    "scrum",
    "rest api",
    "graphql",
    "microservices",
    "linux",
    "unix",
    "api",
    "rest",
    "testing",
    "junit",
    "selenium",
];

/// Returns every vocabulary skill present in `text`, in vocabulary order.
pub fn extract_skills(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| lowered.contains(*skill))
        .map(|skill| skill.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let unique: HashSet<_> = SKILL_VOCABULARY.iter().collect();
        assert_eq!(unique.len(), SKILL_VOCABULARY.len());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let skills = extract_skills("Built services in PYTHON with Docker.");
        assert!(skills.contains(&"python".to_string()));
        assert!(skills.contains(&"docker".to_string()));
    }

    #[test]
    fn test_multi_word_skills() {
        let skills = extract_skills("Experience in Machine Learning and Power BI dashboards");
        assert!(skills.contains(&"machine learning".to_string()));
        assert!(skills.contains(&"power bi".to_string()));
    }

    #[test]
    fn test_substring_semantics_are_preserved() {
        // "javascript" contains "java"; "postgresql" contains "sql"
        let skills = extract_skills("javascript postgresql");
        assert!(skills.contains(&"java".to_string()));
        assert!(skills.contains(&"sql".to_string()));
        assert!(skills.contains(&"postgresql".to_string()));
    }

    #[test]
    fn test_output_follows_vocabulary_order() {
        let skills = extract_skills("selenium then python");
        let python = skills.iter().position(|s| s == "python").unwrap();
        let selenium = skills.iter().position(|s| s == "selenium").unwrap();
        assert!(python < selenium);
    }

    #[test]
    fn test_empty_text_has_no_skills() {
        assert!(extract_skills("").is_empty());
    }
}

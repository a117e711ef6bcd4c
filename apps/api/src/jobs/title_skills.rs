//! Infers required skills for scraped postings that only expose a title.

/// Canonical skill → aliases looked for in the lowercased title.
const TITLE_SKILL_ALIASES: &[(&str, &[&str])] = &[
    ("python", &["python"]),
    ("java", &["java"]),
    ("javascript", &["javascript", "js"]),
    ("react", &["react", "reactjs"]),
    ("node", &["node", "node.js", "nodejs"]),
    ("aws", &["aws", "amazon web services"]),
    ("azure", &["azure"]),
    ("docker", &["docker"]),
    ("kubernetes", &["kubernetes", "k8s"]),
    ("sql", &["sql", "mysql", "postgresql"]),
    ("machine learning", &["machine learning", "ml"]),
    ("data science", &["data science", "data scientist"]),
    ("devops", &["devops"]),
    ("frontend", &["frontend", "front-end", "front end"]),
    ("backend", &["backend", "back-end", "back end"]),
    ("full stack", &["full stack", "fullstack", "full-stack"]),
    ("angular", &["angular"]),
    ("vue", &["vue", "vuejs"]),
    ("django", &["django"]),
    ("flask", &["flask"]),
    ("api", &["api", "rest", "restful"]),
    ("git", &["git", "github"]),
    ("typescript", &["typescript", "ts"]),
    ("mongodb", &["mongodb", "mongo"]),
    ("redis", &["redis"]),
    ("ci/cd", &["ci/cd", "cicd", "jenkins"]),
    ("agile", &["agile", "scrum"]),
    ("testing", &["testing", "test", "qa"]),
];

/// Returns the canonical skills implied by a job title.
///
/// Titles with no recognizable skill get a generic set keyed on the role
/// family (engineering, data, management, anything else).
pub fn skills_from_title(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();

    let found: Vec<String> = TITLE_SKILL_ALIASES
        .iter()
        .filter(|(_, aliases)| aliases.iter().any(|alias| lowered.contains(alias)))
        .map(|(skill, _)| skill.to_string())
        .collect();

    if !found.is_empty() {
        return found;
    }

    let generic: &[&str] = if lowered.contains("engineer") || lowered.contains("developer") {
        &["programming", "software development", "problem solving"]
    } else if lowered.contains("data") {
        &["data analysis", "sql", "python"]
    } else if lowered.contains("manager") {
        &["management", "leadership", "agile"]
    } else {
        &["communication", "teamwork", "problem solving"]
    };
    generic.iter().map(|s| s.to_string()).collect()
}

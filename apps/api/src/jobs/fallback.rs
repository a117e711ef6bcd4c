//! Static job list served when live scraping produces nothing.

use crate::models::job::JobPosting;

struct StaticPosting {
    title: &'static str,
    company: &'static str,
    location: &'static str,
    description: &'static str,
    required_skills: &'static [&'static str],
    link: &'static str,
}

const INDIA_POSTINGS: &[StaticPosting] = &[
    StaticPosting {
        title: "Python Developer",
        company: "TCS",
        location: "Bangalore, India",
        description: "Python developer for enterprise",
        required_skills: &["python", "django", "sql", "rest api", "git"],
        link: "https://www.tcs.com/careers",
    },
    StaticPosting {
        title: "Full Stack Developer",
        company: "Infosys",
        location: "Hyderabad, India",
        description: "Full stack with React and Node.js",
        required_skills: &["javascript", "react", "node", "mongodb", "html", "css"],
        link: "https://www.infosys.com/careers",
    },
    StaticPosting {
        title: "Data Analyst",
        company: "Wipro",
        location: "Pune, India",
        description: "Data analyst with Excel and SQL",
        required_skills: &["excel", "sql", "python", "data analysis", "tableau"],
        link: "https://careers.wipro.com",
    },
    StaticPosting {
        title: "VBA Developer",
        company: "Accenture India",
        location: "Mumbai, India",
        description: "VBA developer for Excel automation",
        required_skills: &["vba", "excel", "macros", "sql", "access"],
        link: "https://www.accenture.com/in-en/careers",
    },
    StaticPosting {
        title: "Java Developer",
        company: "HCL Technologies",
        location: "Chennai, India",
        description: "Java backend developer",
        required_skills: &["java", "spring", "sql", "rest api", "microservices"],
        link: "https://www.hcltech.com/careers",
    },
    StaticPosting {
        title: "DevOps Engineer",
        company: "Tech Mahindra",
        location: "Bangalore, India",
        description: "DevOps with AWS and Docker",
        required_skills: &["aws", "docker", "kubernetes", "jenkins", "linux"],
        link: "https://www.techmahindra.com/careers",
    },
    StaticPosting {
        title: "React Developer",
        company: "Cognizant",
        location: "Noida, India",
        description: "Frontend React developer",
        required_skills: &["react", "javascript", "html", "css", "typescript"],
        link: "https://careers.cognizant.com",
    },
    StaticPosting {
        title: "Business Analyst",
        company: "Capgemini India",
        location: "Gurgaon, India",
        description: "Business analyst with Excel and VBA",
        required_skills: &["excel", "vba", "sql", "power bi", "data analysis"],
        link: "https://www.capgemini.com/in-en/careers",
    },
];

const REMOTE_POSTINGS: &[StaticPosting] = &[
    StaticPosting {
        title: "Senior Python Developer",
        company: "TechCorp Solutions",
        location: "Remote",
        description: "Experienced Python developer for scalable backend",
        required_skills: &["python", "django", "flask", "api", "sql", "git", "docker"],
        link: "https://example.com/jobs/python-dev",
    },
    StaticPosting {
        title: "Data Scientist",
        company: "DataTech Analytics",
        location: "Remote",
        description: "Data Scientist with ML and Python",
        required_skills: &[
            "python",
            "machine learning",
            "data analysis",
            "sql",
            "pandas",
            "numpy",
        ],
        link: "https://example.com/jobs/data-scientist",
    },
    StaticPosting {
        title: "DevOps Engineer",
        company: "Cloud Infrastructure Co",
        location: "Remote",
        description: "DevOps with AWS and Kubernetes",
        required_skills: &["docker", "kubernetes", "aws", "ci/cd", "linux", "git", "python"],
        link: "https://example.com/jobs/devops",
    },
    StaticPosting {
        title: "Frontend React Developer",
        company: "UI/UX Studios",
        location: "Remote",
        description: "Frontend React developer",
        required_skills: &["react", "javascript", "html", "css", "typescript", "git"],
        link: "https://example.com/jobs/frontend",
    },
];

impl StaticPosting {
    fn to_posting(&self) -> JobPosting {
        JobPosting {
            title: self.title.to_string(),
            company: self.company.to_string(),
            location: self.location.to_string(),
            description: self.description.to_string(),
            required_skills: self.required_skills.iter().map(|s| s.to_string()).collect(),
            link: self.link.to_string(),
            scraped_at: None,
            is_fallback: false,
        }
    }
}

/// Returns the full fallback list: Indian-company postings, then remote ones.
pub fn fallback_jobs() -> Vec<JobPosting> {
    INDIA_POSTINGS
        .iter()
        .chain(REMOTE_POSTINGS)
        .map(StaticPosting::to_posting)
        .collect()
}

/// True when `jobs` is non-empty and every posting is one of the fallback
/// postings (same title and company). A thin live scrape topped up with the
/// fallback list still counts as scraped.
pub fn is_fallback_only(jobs: &[JobPosting]) -> bool {
    !jobs.is_empty()
        && jobs.iter().all(|job| {
            INDIA_POSTINGS
                .iter()
                .chain(REMOTE_POSTINGS)
                .any(|p| p.title == job.title && p.company == job.company)
        })
}

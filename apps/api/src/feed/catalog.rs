//! Embedded fallback catalog, served whenever the remote feed is down or degenerate.

use crate::models::job::{JobPosting, Level, WorkType};

struct Entry {
    company: &'static str,
    title: &'static str,
    location: &'static str,
    work_type: WorkType,
    level: Level,
    salary: &'static str,
    skills: &'static [&'static str],
    logo: Option<&'static str>,
    apply_url: &'static str,
    sponsored: bool,
}

const ENTRIES: &[Entry] = &[
    Entry {
        company: "TechCorp",
        title: "Frontend Developer",
        location: "Seoul, Korea",
        work_type: WorkType::Hybrid,
        level: Level::Junior,
        salary: "₩40M - ₩60M",
        skills: &["React", "JavaScript", "CSS"],
        logo: Some("https://logo.clearbit.com/techcorp.com"),
        apply_url: "https://techcorp.com/careers",
        sponsored: false,
    },
    Entry {
        company: "StartupXYZ",
        title: "Full Stack Engineer",
        location: "Remote",
        work_type: WorkType::Remote,
        level: Level::Any,
        salary: "$80K - $120K",
        skills: &["Node.js", "React", "MongoDB"],
        logo: Some("https://logo.clearbit.com/startupxyz.com"),
        apply_url: "http://startupxyz.com/",
        sponsored: false,
    },
    Entry {
        company: "BigTech Inc",
        title: "Software Engineer Intern",
        location: "San Francisco, CA",
        work_type: WorkType::Onsite,
        level: Level::Intern,
        salary: "$6K - $8K/month",
        skills: &["Python", "Machine Learning", "SQL"],
        logo: Some("https://logo.clearbit.com/bigtech.com"),
        apply_url: "https://bigtech.com/internships",
        sponsored: false,
    },
    Entry {
        company: "DesignStudio",
        title: "UX Designer",
        location: "New York, NY",
        work_type: WorkType::Hybrid,
        level: Level::Junior,
        salary: "$70K - $90K",
        skills: &["Figma", "User Research", "Prototyping"],
        logo: Some("https://logo.clearbit.com/designstudio.com"),
        apply_url: "https://designstudio.com/careers",
        sponsored: false,
    },
    Entry {
        company: "DataCorp",
        title: "Data Analyst",
        location: "London, UK",
        work_type: WorkType::Remote,
        level: Level::Any,
        salary: "£45K - £65K",
        skills: &["Python", "SQL", "Analytics"],
        logo: Some("https://logo.clearbit.com/datacorp.com"),
        apply_url: "https://datacorp.com/opportunities",
        sponsored: false,
    },
    Entry {
        company: "MobileFirst",
        title: "Mobile Developer",
        location: "Tokyo, Japan",
        work_type: WorkType::Onsite,
        level: Level::Junior,
        salary: "¥6M - ¥8M",
        skills: &["React Native", "iOS", "Android"],
        logo: None,
        apply_url: "#",
        sponsored: false,
    },
    Entry {
        company: "CloudTech",
        title: "DevOps Engineer",
        location: "Austin, TX",
        work_type: WorkType::Hybrid,
        level: Level::Any,
        salary: "$90K - $130K",
        skills: &["AWS", "Docker", "Kubernetes"],
        logo: None,
        apply_url: "#",
        sponsored: false,
    },
    Entry {
        company: "AI Solutions",
        title: "Machine Learning Engineer",
        location: "Remote",
        work_type: WorkType::Remote,
        level: Level::Any,
        salary: "$100K - $150K",
        skills: &["Python", "TensorFlow", "Deep Learning"],
        logo: None,
        apply_url: "#",
        sponsored: false,
    },
    Entry {
        company: "FinTech Co",
        title: "Backend Developer",
        location: "Singapore",
        work_type: WorkType::Onsite,
        level: Level::Junior,
        salary: "S$60K - S$80K",
        skills: &["Java", "Spring Boot", "PostgreSQL"],
        logo: None,
        apply_url: "#",
        sponsored: false,
    },
    Entry {
        company: "GameStudio",
        title: "Game Developer",
        location: "Vancouver, Canada",
        work_type: WorkType::Hybrid,
        level: Level::Any,
        salary: "C$70K - C$95K",
        skills: &["Unity", "C#", "Game Design"],
        logo: None,
        apply_url: "#",
        sponsored: false,
    },
    Entry {
        company: "Spotify",
        title: "Frontend Engineer",
        location: "Stockholm, Sweden",
        work_type: WorkType::Hybrid,
        level: Level::Junior,
        salary: "SEK 500K - SEK 700K",
        skills: &["React", "TypeScript", "Node.js"],
        logo: Some("https://logo.clearbit.com/spotify.com"),
        apply_url: "https://jobs.spotify.com",
        sponsored: true,
    },
    Entry {
        company: "Stripe",
        title: "Backend Engineer",
        location: "San Francisco, CA",
        work_type: WorkType::Onsite,
        level: Level::Any,
        salary: "$150K - $200K",
        skills: &["Ruby", "Go", "PostgreSQL"],
        logo: Some("https://logo.clearbit.com/stripe.com"),
        apply_url: "https://stripe.com/jobs",
        sponsored: true,
    },
    Entry {
        company: "Shopify",
        title: "Full Stack Developer",
        location: "Remote",
        work_type: WorkType::Remote,
        level: Level::Junior,
        salary: "$80K - $120K",
        skills: &["Ruby on Rails", "React", "GraphQL"],
        logo: Some("https://logo.clearbit.com/shopify.com"),
        apply_url: "https://jobs.shopify.com",
        sponsored: true,
    },
    Entry {
        company: "GitHub",
        title: "Software Engineer",
        location: "Remote",
        work_type: WorkType::Remote,
        level: Level::Any,
        salary: "$120K - $180K",
        skills: &["Ruby", "Go", "Git"],
        logo: Some("https://logo.clearbit.com/github.com"),
        apply_url: "https://github.com/careers",
        sponsored: true,
    },
    Entry {
        company: "Netflix",
        title: "Senior Software Engineer",
        location: "Los Gatos, CA",
        work_type: WorkType::Hybrid,
        level: Level::Any,
        salary: "$200K - $300K",
        skills: &["Java", "Spring", "Microservices"],
        logo: Some("https://logo.clearbit.com/netflix.com"),
        apply_url: "https://jobs.netflix.com",
        sponsored: true,
    },
    Entry {
        company: "Uber",
        title: "Mobile Engineer",
        location: "San Francisco, CA",
        work_type: WorkType::Hybrid,
        level: Level::Any,
        salary: "$140K - $190K",
        skills: &["Swift", "Kotlin", "iOS", "Android"],
        logo: None,
        apply_url: "#",
        sponsored: true,
    },
    Entry {
        company: "Lyft",
        title: "Data Scientist",
        location: "San Francisco, CA",
        work_type: WorkType::Hybrid,
        level: Level::Any,
        salary: "$130K - $180K",
        skills: &["Python", "Machine Learning", "SQL"],
        logo: None,
        apply_url: "#",
        sponsored: true,
    },
    Entry {
        company: "Tesla",
        title: "Autopilot Engineer",
        location: "Austin, TX",
        work_type: WorkType::Onsite,
        level: Level::Any,
        salary: "$160K - $220K",
        skills: &["C++", "Python", "Computer Vision"],
        logo: None,
        apply_url: "#",
        sponsored: true,
    },
    Entry {
        company: "Meta",
        title: "Product Designer",
        location: "Menlo Park, CA",
        work_type: WorkType::Hybrid,
        level: Level::Junior,
        salary: "$120K - $160K",
        skills: &["Figma", "User Research", "Prototyping"],
        logo: None,
        apply_url: "#",
        sponsored: true,
    },
    Entry {
        company: "Google",
        title: "Software Engineer Intern",
        location: "Mountain View, CA",
        work_type: WorkType::Onsite,
        level: Level::Intern,
        salary: "$8K - $10K/month",
        skills: &["Python", "C++", "Algorithms"],
        logo: None,
        apply_url: "#",
        sponsored: true,
    },
];

/// Builds the fallback catalog. Ids are `fallback-1` … `fallback-N`, in
/// catalog order.
pub fn fallback_catalog() -> Vec<JobPosting> {
    ENTRIES
        .iter()
        .enumerate()
        .map(|(i, e)| JobPosting {
            id: format!("fallback-{}", i + 1),
            company: e.company.to_string(),
            title: e.title.to_string(),
            location: e.location.to_string(),
            work_type: e.work_type,
            level: e.level,
            skills: e.skills.iter().map(|s| s.to_string()).collect(),
            salary: Some(e.salary.to_string()),
            apply_url: Some(e.apply_url.to_string()),
            sponsored: e.sponsored,
            logo: e.logo.map(str::to_string),
        })
        .collect()
}

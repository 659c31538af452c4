//! Sample content generator behind `folio seed`.

use std::sync::Arc;

use rand::{Rng, seq::SliceRandom};
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::application::repos::{
    ContentWriteRepo, CreatePostParams, CreateUserParams, RepoError,
};

pub const ROLES: &[&str] = &[
    "Senior Software Engineer",
    "UX Designer",
    "DevOps Engineer",
    "Product Manager",
    "Full Stack Developer",
    "Frontend Developer",
    "Backend Developer",
    "Data Scientist",
    "Tech Lead",
    "Engineering Manager",
];

pub const TECH_TAGS: &[&str] = &[
    "Node.js",
    "React",
    "TypeScript",
    "JavaScript",
    "Docker",
    "Kubernetes",
    "AWS",
    "DevOps",
    "CI/CD",
    "Microservices",
    "GraphQL",
    "REST API",
    "MongoDB",
    "PostgreSQL",
    "Redis",
    "Next.js",
    "Tailwind CSS",
    "Design Systems",
    "UI/UX",
    "Figma",
    "Product Management",
    "Agile",
    "Scrum",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Linus", "Margaret", "Ken", "Barbara", "Dennis", "Frances", "Alan", "Radia",
    "Edsger", "Katherine", "Donald", "Hedy", "Guido", "Annie",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Torvalds", "Hamilton", "Thompson", "Liskov", "Ritchie", "Allen",
    "Turing", "Perlman", "Dijkstra", "Johnson", "Knuth", "Lamarr", "Rossum", "Easley",
];

const CITIES: &[(&str, &str)] = &[
    ("Lisbon", "Portugal"),
    ("Toronto", "Canada"),
    ("Nairobi", "Kenya"),
    ("Osaka", "Japan"),
    ("Austin", "United States"),
    ("Berlin", "Germany"),
    ("Bogotá", "Colombia"),
    ("Melbourne", "Australia"),
];

const BIO_FRAGMENTS: &[&str] = &[
    "coffee enthusiast",
    "open source maintainer",
    "conference speaker",
    "mentor",
    "lifelong learner",
    "weekend hiker",
    "amateur photographer",
    "board game collector",
];

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
];

const TAGS_MIN: usize = 2;
const TAGS_MAX: usize = 5;
const READ_TIME_MIN: i64 = 3;
const READ_TIME_MAX: i64 = 15;
const PUBLISHED_WITHIN_DAYS: i64 = 90;
const JOINED_WITHIN_DAYS: i64 = 5 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    pub users: u32,
    pub posts_per_user: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub users: u32,
    pub posts: u32,
}

pub struct Seeder {
    repo: Arc<dyn ContentWriteRepo>,
}

impl Seeder {
    pub fn new(repo: Arc<dyn ContentWriteRepo>) -> Self {
        Self { repo }
    }

    /// Replace every user and post with freshly generated content.
    pub async fn run<R: Rng + Send>(
        &self,
        plan: SeedPlan,
        rng: &mut R,
    ) -> Result<SeedSummary, RepoError> {
        self.repo.clear_content().await?;
        info!(target = "folio::seed", "cleared existing users and posts");

        let now = OffsetDateTime::now_utc();
        let mut summary = SeedSummary::default();

        for index in 0..plan.users {
            let user = self.repo.create_user(fake_user(rng, index, now)).await?;
            summary.users += 1;

            for _ in 0..plan.posts_per_user {
                self.repo.create_post(fake_post(rng, user.id, now)).await?;
                summary.posts += 1;
            }
        }

        info!(
            target = "folio::seed",
            users = summary.users,
            posts = summary.posts,
            "database seeded"
        );
        Ok(summary)
    }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &'a [&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn fake_user<R: Rng>(rng: &mut R, index: u32, now: OffsetDateTime) -> CreateUserParams {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    // Index suffix keeps generated emails unique.
    let username = format!("{}.{}{}", first, last, index + 1).to_lowercase();
    let (city, country) = CITIES.choose(rng).copied().unwrap_or(("Remote", "Earth"));
    let bio = format!(
        "{}, {}",
        pick(rng, BIO_FRAGMENTS),
        pick(rng, BIO_FRAGMENTS)
    );

    CreateUserParams {
        name: format!("{first} {last}"),
        email: format!("{username}@example.com"),
        avatar: Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={username}"
        )),
        role: pick(rng, ROLES).to_string(),
        bio: Some(bio),
        location: Some(format!("{city}, {country}")),
        joined_date: now - Duration::days(rng.gen_range(1..=JOINED_WITHIN_DAYS)),
        website: Some(format!("https://{username}.dev")),
        github: Some(username.clone()),
        twitter: Some(username),
    }
}

fn fake_post<R: Rng>(rng: &mut R, author_id: i64, now: OffsetDateTime) -> CreatePostParams {
    let tag_count = rng.gen_range(TAGS_MIN..=TAGS_MAX);
    let tags = TECH_TAGS
        .choose_multiple(rng, tag_count)
        .map(|tag| tag.to_string())
        .collect();

    let subject = pick(rng, TECH_TAGS);
    let title = match rng.gen_range(0..7) {
        0 => format!("Building {subject} Applications"),
        1 => format!("Getting Started with {subject}"),
        2 => format!("Advanced {subject} Techniques"),
        3 => format!("{subject} Best Practices"),
        4 => format!("The Future of {subject}"),
        5 => format!("Mastering {subject}"),
        _ => format!("{subject}: A Complete Guide"),
    };

    let excerpt_words = rng.gen_range(15..=25);
    let paragraphs: Vec<String> = (0..rng.gen_range(3..=6))
        .map(|_| lorem_paragraph(rng))
        .collect();

    CreatePostParams {
        title,
        excerpt: lorem_sentence(rng, excerpt_words),
        content: paragraphs.join("\n\n"),
        author_id,
        published_date: now - Duration::minutes(rng.gen_range(1..=PUBLISHED_WITHIN_DAYS * 24 * 60)),
        read_time: rng.gen_range(READ_TIME_MIN..=READ_TIME_MAX),
        tags,
    }
}

fn lorem_sentence<R: Rng>(rng: &mut R, words: usize) -> String {
    let mut sentence = (0..words)
        .map(|_| pick(rng, LOREM))
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = sentence.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    sentence.push('.');
    sentence
}

fn lorem_paragraph<R: Rng>(rng: &mut R) -> String {
    (0..rng.gen_range(3..=6))
        .map(|_| {
            let words = rng.gen_range(8..=16);
            lorem_sentence(rng, words)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Demo workspace fixtures.

use crate::credentials::{hash_password, CredentialError};
use crate::model::client::{
    ApplicationStatus, Client, ClientStatus, GeneralInformation, Holding, LoanDetails, RiskProfile,
};
use crate::model::commitment::Commitment;
use crate::model::interaction::{Interaction, InteractionType};
use crate::model::task::{Task, TaskPriority};
use crate::model::team::Team;
use crate::model::user::{Role, User, UserStatus};
use crate::seed::SeedData;
use chrono::{Days, NaiveDate, NaiveTime, TimeZone, Utc};

struct DemoUser {
    id: &'static str,
    name: &'static str,
    username: &'static str,
    password: &'static str,
    role: Role,
    status: UserStatus,
    shift: Option<(&'static str, &'static str)>,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        id: "user-admin",
        name: "Meera Kapoor",
        username: "admin",
        password: "admin123",
        role: Role::Admin,
        status: UserStatus::Active,
        shift: Some(("09:00", "18:00")),
    },
    DemoUser {
        id: "user-vikram",
        name: "Vikram Rao",
        username: "vikram",
        password: "vikram123",
        role: Role::SubAdmin,
        status: UserStatus::Active,
        shift: Some(("09:00", "18:00")),
    },
    DemoUser {
        id: "user-priya",
        name: "Priya Nair",
        username: "priya",
        password: "priya123",
        role: Role::TeamLead,
        status: UserStatus::Active,
        shift: Some(("09:30", "18:30")),
    },
    DemoUser {
        id: "user-asha",
        name: "Asha Verma",
        username: "asha",
        password: "asha123",
        role: Role::Agent,
        status: UserStatus::Active,
        shift: Some(("09:30", "18:30")),
    },
    DemoUser {
        id: "user-ravi",
        name: "Ravi Menon",
        username: "ravi",
        password: "ravi123",
        role: Role::Agent,
        status: UserStatus::Active,
        shift: Some(("11:00", "20:00")),
    },
    DemoUser {
        id: "user-kiran",
        name: "Kiran Das",
        username: "kiran",
        password: "kiran123",
        role: Role::Trainee,
        status: UserStatus::Active,
        shift: None,
    },
    DemoUser {
        id: "user-sunil",
        name: "Sunil Joshi",
        username: "sunil",
        password: "sunil123",
        role: Role::Agent,
        status: UserStatus::Inactive,
        shift: None,
    },
];

/// Builds the demo data set relative to `today`.
///
/// Fixture passwords are hashed with `hash_cost`; the clear values are the
/// usernames suffixed with `123`.
pub fn demo_seed(today: NaiveDate, hash_cost: u32) -> Result<SeedData, CredentialError> {
    let mut users = Vec::with_capacity(DEMO_USERS.len());
    for demo in DEMO_USERS {
        users.push(User {
            id: demo.id.to_string(),
            name: demo.name.to_string(),
            email: Some(format!("{}@loandesk.local", demo.username)),
            username: demo.username.to_string(),
            password_hash: hash_password(demo.password, hash_cost)?,
            role: demo.role,
            status: demo.status,
            shift_start_time: demo.shift.map(|(start, _)| start.to_string()),
            shift_end_time: demo.shift.map(|(_, end)| end.to_string()),
        });
    }

    let teams = vec![Team {
        id: "team-north".to_string(),
        name: "North Desk".to_string(),
        team_lead_id: Some("user-priya".to_string()),
        member_ids: vec![
            "user-asha".to_string(),
            "user-ravi".to_string(),
            "user-kiran".to_string(),
        ],
    }];

    let days_ago = |n: u64| today.checked_sub_days(Days::new(n)).unwrap_or(today);
    let days_ahead = |n: u64| today.checked_add_days(Days::new(n)).unwrap_or(today);

    let clients = vec![
        demo_client(DemoClient {
            id: "client-anand",
            name: "Anand Sharma",
            status: ClientStatus::Lead,
            loan_type: "Home Loan",
            lead_source: "Website",
            assigned_to: Some("user-asha"),
            contact_date: days_ago(2),
            follow_up_date: None,
            loan: LoanDetails {
                requested_amount: 4_500_000,
                ..LoanDetails::default()
            },
            application_status: ApplicationStatus::Pending,
        }),
        demo_client(DemoClient {
            id: "client-farah",
            name: "Farah Khan",
            status: ClientStatus::FollowUp,
            loan_type: "Business Loan",
            lead_source: "Referral",
            assigned_to: Some("user-asha"),
            contact_date: days_ago(9),
            follow_up_date: Some(today),
            loan: LoanDetails {
                requested_amount: 2_000_000,
                ..LoanDetails::default()
            },
            application_status: ApplicationStatus::Verification,
        }),
        demo_client(DemoClient {
            id: "client-george",
            name: "George Mathew",
            status: ClientStatus::Approved,
            loan_type: "Personal Loan",
            lead_source: "Walk-in",
            assigned_to: Some("user-ravi"),
            contact_date: days_ago(21),
            follow_up_date: None,
            loan: LoanDetails {
                requested_amount: 600_000,
                approved_amount: 500_000,
                disbursed_amount: 0,
                approval_date: Some(days_ago(3)),
            },
            application_status: ApplicationStatus::Sanctioned,
        }),
        demo_client(DemoClient {
            id: "client-hema",
            name: "Hema Iyer",
            status: ClientStatus::Active,
            loan_type: "Home Loan",
            lead_source: "Partner Bank",
            assigned_to: Some("user-ravi"),
            contact_date: days_ago(60),
            follow_up_date: None,
            loan: LoanDetails {
                requested_amount: 7_500_000,
                approved_amount: 7_000_000,
                disbursed_amount: 7_000_000,
                approval_date: Some(days_ago(30)),
            },
            application_status: ApplicationStatus::Disbursed,
        }),
        demo_client(DemoClient {
            id: "client-imran",
            name: "Imran Qureshi",
            status: ClientStatus::Rejected,
            loan_type: "Vehicle Loan",
            lead_source: "Cold Call",
            assigned_to: None,
            contact_date: days_ago(14),
            follow_up_date: None,
            loan: LoanDetails {
                requested_amount: 900_000,
                ..LoanDetails::default()
            },
            application_status: ApplicationStatus::Pending,
        }),
        demo_client(DemoClient {
            id: "client-jaya",
            name: "Jaya Pillai",
            status: ClientStatus::Lead,
            loan_type: "Education Loan",
            lead_source: "Social Media",
            assigned_to: None,
            contact_date: days_ago(1),
            follow_up_date: Some(days_ahead(2)),
            loan: LoanDetails {
                requested_amount: 1_200_000,
                ..LoanDetails::default()
            },
            application_status: ApplicationStatus::Pending,
        }),
    ];

    let tasks = vec![
        demo_task(
            "task-farah-docs",
            "Collect GST returns from Farah",
            Some("client-farah"),
            today,
            TaskPriority::High,
            "user-asha",
        ),
        demo_task(
            "task-george-sanction",
            "Share sanction letter with George",
            Some("client-george"),
            days_ago(1),
            TaskPriority::Medium,
            "user-ravi",
        ),
        demo_task(
            "task-anand-call",
            "Intro call with Anand",
            Some("client-anand"),
            days_ahead(1),
            TaskPriority::Medium,
            "user-asha",
        ),
        demo_task(
            "task-weekly-review",
            "Weekly pipeline review",
            None,
            days_ahead(4),
            TaskPriority::Low,
            "user-priya",
        ),
    ];

    let at = |date: NaiveDate, hour: u32| {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
        Utc.from_utc_datetime(&date.and_time(time))
    };
    let interactions = vec![
        Interaction {
            id: "interaction-farah-call".to_string(),
            client_id: Some("client-farah".to_string()),
            kind: InteractionType::Call,
            subject: None,
            notes: "Discussed collateral options; awaiting GST returns.".to_string(),
            attachments: Vec::new(),
            user_id: "user-asha".to_string(),
            timestamp: at(days_ago(9), 11),
        },
        Interaction {
            id: "interaction-george-email".to_string(),
            client_id: Some("client-george".to_string()),
            kind: InteractionType::Email,
            subject: Some("Your loan has been approved".to_string()),
            notes: "Sent approval summary and next steps.".to_string(),
            attachments: vec!["approval-summary.pdf".to_string()],
            user_id: "user-ravi".to_string(),
            timestamp: at(days_ago(3), 15),
        },
        Interaction {
            id: "interaction-anand-whatsapp".to_string(),
            client_id: Some("client-anand".to_string()),
            kind: InteractionType::WhatsApp,
            subject: None,
            notes: "Shared document checklist.".to_string(),
            attachments: Vec::new(),
            user_id: "user-asha".to_string(),
            timestamp: at(days_ago(2), 10),
        },
    ];

    let commitments = vec![
        Commitment {
            id: "commitment-north-q".to_string(),
            title: "North Desk quarterly disbursals".to_string(),
            user_id: Some("user-priya".to_string()),
            target_amount: 25_000_000,
            current_amount: 7_000_000,
            due_date: days_ahead(45),
            created_by: "user-admin".to_string(),
        },
        Commitment {
            id: "commitment-ravi-month".to_string(),
            title: "Ravi monthly sanctions".to_string(),
            user_id: Some("user-ravi".to_string()),
            target_amount: 5_000_000,
            current_amount: 500_000,
            due_date: days_ahead(12),
            created_by: "user-priya".to_string(),
        },
    ];

    Ok(SeedData {
        users,
        teams,
        clients,
        tasks,
        interactions,
        activity_logs: Vec::new(),
        commitments,
        documents: Vec::new(),
    })
}

struct DemoClient {
    id: &'static str,
    name: &'static str,
    status: ClientStatus,
    loan_type: &'static str,
    lead_source: &'static str,
    assigned_to: Option<&'static str>,
    contact_date: NaiveDate,
    follow_up_date: Option<NaiveDate>,
    loan: LoanDetails,
    application_status: ApplicationStatus,
}

fn demo_client(demo: DemoClient) -> Client {
    let slug = demo.id.trim_start_matches("client-");
    Client {
        id: demo.id.to_string(),
        name: demo.name.to_string(),
        email: Some(format!("{slug}@example.com")),
        phone: None,
        status: demo.status,
        loan_type: demo.loan_type.to_string(),
        lead_source: demo.lead_source.to_string(),
        assigned_to: demo.assigned_to.map(str::to_string),
        created_by: "user-admin".to_string(),
        contact_date: demo.contact_date,
        follow_up_date: demo.follow_up_date,
        risk_profile: RiskProfile::Moderate,
        financial_goals: Vec::new(),
        portfolio: match demo.status {
            ClientStatus::Active => vec![Holding {
                name: "Fixed deposit".to_string(),
                value: 800_000,
            }],
            _ => Vec::new(),
        },
        loan_details: demo.loan,
        application_status: demo.application_status,
        general_information: GeneralInformation::default(),
    }
}

fn demo_task(
    id: &str,
    title: &str,
    client_id: Option<&str>,
    due_date: NaiveDate,
    priority: TaskPriority,
    owner: &str,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        client_id: client_id.map(str::to_string),
        due_date,
        completed: false,
        priority,
        assigned_to: Some(owner.to_string()),
        created_by: owner.to_string(),
    }
}

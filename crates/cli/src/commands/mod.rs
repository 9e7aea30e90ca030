//! Command handlers.

mod auth;
mod complaints;
mod departments;

use crate::context::Context;
use crate::Commands;

pub async fn run(command: Commands, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Commands::Login {
            username,
            password,
            google,
        } => {
            if google {
                auth::google_url(ctx)
            } else {
                auth::login(ctx, username, password).await
            }
        }
        Commands::AdoptTokens { access, refresh } => auth::adopt(ctx, access, refresh).await,
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => auth::register(ctx, username, email, password, first_name, last_name).await,
        Commands::Logout => auth::logout(ctx).await,
        Commands::Whoami => auth::whoami(ctx),

        Commands::Track { code } => complaints::track(ctx, &code).await,
        Commands::Feed {
            category,
            from,
            to,
            status,
            sort,
        } => {
            let query = civic_core::complaint::FeedQuery {
                category,
                date_from: from,
                date_to: to,
                status,
                sort,
            };
            complaints::feed(ctx, &query).await
        }
        Commands::Show { id } => complaints::show(ctx, id).await,
        Commands::Upvote { id } => complaints::upvote(ctx, id).await,
        Commands::Submit {
            category,
            title,
            description,
            location,
            lat,
            lon,
            images,
        } => {
            let mut input =
                civic_core::complaint::NewComplaint::new(category, title, description, location);
            if let (Some(lat), Some(lon)) = (lat, lon) {
                input = input.with_coordinates(lat, lon);
            }
            complaints::submit(ctx, input, &images).await
        }
        Commands::Complaints => complaints::list(ctx).await,
        Commands::SetStatus { id, status } => complaints::set_status(ctx, id, status).await,
        Commands::Assign {
            id,
            department,
            clear_department,
            officer,
            clear_officer,
        } => {
            let mut assignment = civic_core::complaint::Assignment::default();
            if clear_department {
                assignment = assignment.department(None);
            } else if let Some(department) = department {
                assignment = assignment.department(Some(department));
            }
            if clear_officer {
                assignment = assignment.officer(None);
            } else if let Some(officer) = officer {
                assignment = assignment.officer(Some(officer));
            }
            complaints::assign(ctx, id, &assignment).await
        }

        Commands::Departments => departments::list(ctx).await,
        Commands::Officers { department_id } => departments::officers(ctx, department_id).await,
    }
}

use crate::{
    api::{employee, leave_request, me, report},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    store::LeaveStore,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let ms_per_request = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(ms_per_request)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure<S: LeaveStore>(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = build_limiter(config.rate_login_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth").service(
            web::resource("/login")
                .wrap(login_limiter)
                .route(web::post().to(handlers::login::<S>)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees::<S>))
                            .route(web::post().to(employee::create_employee::<S>)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee::<S>))
                            .route(web::patch().to(employee::update_employee::<S>))
                            .route(web::delete().to(employee::delete_employee::<S>)),
                    )
                    .service(
                        web::resource("/{id}/balance")
                            .route(web::get().to(employee::employee_balance::<S>)),
                    )
                    .service(
                        web::resource("/{id}/leaves")
                            .route(web::get().to(employee::employee_leaves::<S>)),
                    ),
            )
            .service(
                web::scope("/leaves")
                    // /leaves
                    .service(web::resource("").route(web::get().to(leave_request::leave_list::<S>)))
                    // /leaves/pending
                    .service(
                        web::resource("/pending")
                            .route(web::get().to(leave_request::pending_leaves::<S>)),
                    )
                    // /leaves/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave::<S>)),
                    )
                    // /leaves/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave::<S>)),
                    ),
            )
            .service(
                web::scope("/reports")
                    .route("/on-leave", web::get().to(report::on_leave::<S>))
                    .route("/overdue", web::get().to(report::overdue::<S>))
                    .route("/present", web::get().to(report::present::<S>))
                    .route("/leave-days", web::get().to(report::leave_days::<S>)),
            )
            .service(
                web::scope("/me")
                    .service(web::resource("").route(web::get().to(me::profile::<S>)))
                    .service(
                        web::resource("/leaves")
                            .route(web::get().to(me::my_leaves::<S>))
                            .route(web::post().to(me::apply_leave::<S>)),
                    )
                    .route("/status", web::get().to(me::status::<S>))
                    .route("/notification", web::get().to(me::notification::<S>)),
            ),
    );
}

use criterion::{criterion_group, criterion_main, Criterion};

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::token::TokenType;
use service::test_support::{alice, in_memory_auth, test_issuer};

fn bench_login(c: &mut Criterion) {
    let (svc, _repo) = in_memory_auth(Default::default());

    // pre-create the account outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.register(RegisterInput {
        username: Some("bench".into()),
        email: Some("bench@example.com".into()),
        password: Some("Benchmark1".into()),
        ..Default::default()
    }))
    .unwrap();

    c.bench_function("auth_login_by_username", |b| {
        b.iter(|| rt.block_on(svc.login(LoginInput::new("bench", "Benchmark1"))).unwrap());
    });
    c.bench_function("auth_login_by_email", |b| {
        b.iter(|| rt.block_on(svc.login(LoginInput::new("bench@example.com", "Benchmark1"))).unwrap());
    });
}

fn bench_tokens(c: &mut Criterion) {
    let issuer = test_issuer();
    let token = issuer.issue_access_token(&alice()).unwrap();

    c.bench_function("token_issue_pair", |b| b.iter(|| issuer.issue_pair(&alice()).unwrap()));
    c.bench_function("token_validate_access", |b| {
        b.iter(|| issuer.validate(&token, TokenType::Access).unwrap())
    });
}

criterion_group!(benches, bench_login, bench_tokens);
criterion_main!(benches);

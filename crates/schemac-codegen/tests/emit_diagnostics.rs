use schemac_codegen::{Emitter, EmitterKind, Endpoint, Persistence, Target};
use schemac_core::{DiagnosticKind, Schema};

const WITH_AUDIT: &str = "\
Table Users {
  id UUID [pk]
  kind video_types [enum]
}

Table Audit {
  note TEXT
  at TIMESTAMP
}

Enum video_types {
  GATE Gate
  ESE
}
";

#[test]
fn endpoint_skips_table_without_key() {
    let schema = Schema::parse(WITH_AUDIT).unwrap();
    let output = Endpoint.emit(&schema).unwrap();

    assert!(output.file("UsersEndpoint.swift").is_some());
    assert!(output.file("AuditEndpoint.swift").is_none());

    let skipped: Vec<_> = output.diagnostics.about("Audit").collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].kind, DiagnosticKind::Skipped);
}

#[test]
fn other_emitters_still_cover_the_table() {
    let schema = Schema::parse(WITH_AUDIT).unwrap();

    for kind in Target::All.kinds() {
        let output = kind.emitter().emit(&schema).unwrap();

        let expected = match kind {
            EmitterKind::Persistence => Some("AuditModel.py"),
            EmitterKind::Transfer => Some("AuditSchema.py"),
            EmitterKind::ClientModel => Some("Audit.swift"),
            EmitterKind::ViewModel => Some("AuditViewModel.swift"),
            EmitterKind::Endpoint | EmitterKind::Protocol => None,
        };

        if let Some(path) = expected {
            assert!(output.file(path).is_some(), "{kind} did not emit {path}");
            assert!(
                output.diagnostics.is_empty(),
                "{kind}: {:?}",
                output.diagnostics
            );
        }
    }
}

#[test]
fn enum_column_uses_default_member() {
    let schema = Schema::parse(WITH_AUDIT).unwrap();
    let output = Persistence::default().emit(&schema).unwrap();

    let users = &output.file("UsersModel.py").unwrap().contents;
    assert!(users.contains("from .VideoTypesEnum import VideoTypes\n"));
    assert!(users.contains(
        "    kind = Column(SQLEnum(VideoTypes, name='video_types'), \
         nullable=False, default=VideoTypes.Gate)\n"
    ));

    assert_eq!(
        output.file("VideoTypesEnum.py").unwrap().contents,
        "from enum import Enum\n\n\n\
         class VideoTypes(str, Enum):\n    \
         Gate = 'GATE'\n    \
         ESE = 'ESE'\n"
    );
}

#[test]
fn enum_without_alias_has_no_default() {
    let src = WITH_AUDIT.replace("GATE Gate", "GATE");
    let schema = Schema::parse(&src).unwrap();
    let output = Persistence::default().emit(&schema).unwrap();

    let users = &output.file("UsersModel.py").unwrap().contents;
    assert!(users.contains(
        "    kind = Column(SQLEnum(VideoTypes, name='video_types'), nullable=False)\n"
    ));

    let defaulted: Vec<_> = output.diagnostics.about("Users.kind").collect();
    assert_eq!(defaulted.len(), 1);
    assert_eq!(defaulted[0].kind, DiagnosticKind::Defaulted);
    assert!(defaulted[0].reason.contains("video_types"));
}

use chrono::Local;
use psico_agenda::domain::events::RefreshTrigger;
use psico_agenda::domain::view::DashboardView;
use psico_agenda::model::User;

const WELCOME: &str = "Bem-vindo ao Sunshine! Você é novo por aqui. Seus pacientes e \
agendamentos aparecerão neste dashboard conforme você começar a receber solicitações e \
agendar sessões.";

pub fn dashboard(view: &DashboardView, trigger: RefreshTrigger) -> String {
    let mut lines = vec![
        format!(
            "== Dashboard ({trigger:?}, {}) ==",
            view.generated_at.format("%d/%m/%Y %H:%M:%S")
        ),
        format!("Bem-vindo, {}", view.greeting_name),
    ];

    if view.is_new_psychologist {
        lines.push(WELCOME.to_string());
    }

    lines.extend([
        format!("  Pacientes Ativos:       {}", view.active_patients),
        format!("  Sessões Hoje:           {}", view.today_sessions),
        format!("  Sessões Concluídas:     {}", view.completed_sessions),
        format!("  Solicitações Pendentes: {}", view.pending_requests),
    ]);

    if view.show_upcoming {
        lines.push("Próximos Agendamentos".to_string());
        if view.upcoming.is_empty() {
            lines.push("  Nenhum agendamento futuro encontrado.".to_string());
            if let Some(hint) = view.upcoming_hint {
                lines.push(format!("  {}", hint.message()));
            }
        }
        lines.extend(view.upcoming.iter().map(|entry| {
            format!(
                "  {}  {}",
                entry
                    .appointment
                    .date
                    .with_timezone(&Local)
                    .format("%d/%m %H:%M"),
                entry.patient.name
            )
        }));
    }

    lines.into_iter().map(|line| line + "\n").collect()
}

pub fn user(user: &User) -> String {
    format!("{} <{}> [{}] id={}", user.name, user.email, user.role, user.id)
}

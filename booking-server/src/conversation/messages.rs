//! Reply catalogue (pt-BR)
//!
//! Every user-visible string lives here. Replies never include error text.

use chrono::{Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use shared::models::serde_helpers::format_hhmm;
use shared::models::{ServiceKind, ServiceOffering, Slot, weekday_of};

const BACK_OPTION: &str = "0 - Voltar";

pub fn ask_name() -> String {
    "Olá! Bem-vindo(a) à nossa barbearia. 💈\nPara começar, qual é o seu nome?".to_string()
}

pub fn invalid_name() -> String {
    "Nome inválido. Por favor, digite seu nome (pelo menos 2 letras).".to_string()
}

pub fn invalid_option(prompt: &str) -> String {
    format!("Opção inválida.\n\n{prompt}")
}

pub fn technical_error() -> String {
    "Desculpe, ocorreu um erro técnico. Por favor, tente novamente em instantes.".to_string()
}

pub fn main_menu(name: &str) -> String {
    format!(
        "Olá, {name}! Como posso ajudar?\n\
         1 - Agendar horário\n\
         2 - Meus agendamentos\n\
         0 - Sair"
    )
}

pub fn goodbye() -> String {
    "Até logo! Quando quiser, é só mandar uma mensagem.".to_string()
}

pub fn existing_appointment_menu(
    name: &str,
    service: ServiceKind,
    date: NaiveDate,
    time: NaiveTime,
) -> String {
    format!(
        "Olá, {name}! Você já tem um agendamento:\n\
         {} em {} às {}.\n\n\
         1 - Manter agendamento\n\
         2 - Remarcar\n\
         3 - Cancelar\n\
         4 - Novo agendamento",
        service_label(service),
        format_date(date),
        format_hhmm(time)
    )
}

pub fn appointment_kept() -> String {
    "Perfeito, seu agendamento está mantido. Até breve!".to_string()
}

pub fn appointment_cancelled(name: &str) -> String {
    format!("Seu agendamento foi cancelado.\n\n{}", main_menu(name))
}

pub fn reschedule_intro() -> String {
    "Seu agendamento anterior foi cancelado. Vamos escolher um novo horário.".to_string()
}

pub fn registered(name: &str, services: &[ServiceOffering]) -> String {
    format!("Prazer, {name}! Cadastro realizado.\n\n{}", service_list(services))
}

pub fn service_list(services: &[ServiceOffering]) -> String {
    let mut out = String::from("Escolha o serviço:\n");
    for (i, service) in services.iter().enumerate() {
        out.push_str(&format!(
            "{} - {} ({})\n",
            i + 1,
            service.name,
            format_price(service.price)
        ));
    }
    out.push_str(BACK_OPTION);
    out
}

/// `future` is (local date, local time, service) per appointment
pub fn future_appointments(name: &str, future: &[(NaiveDate, NaiveTime, ServiceKind)]) -> String {
    if future.is_empty() {
        return format!("Você não tem agendamentos futuros.\n\n{}", main_menu(name));
    }
    let mut out = String::from("Seus próximos agendamentos:\n");
    for (date, time, service) in future {
        out.push_str(&format!(
            "• {} às {} - {}\n",
            format_date(*date),
            format_hhmm(*time),
            service_label(*service)
        ));
    }
    out.push('\n');
    out.push_str(&main_menu(name));
    out
}

pub fn no_working_days(name: &str) -> String {
    format!(
        "Desculpe, não há dias disponíveis para agendamento no momento.\n\n{}",
        main_menu(name)
    )
}

pub fn day_list(dates: &[NaiveDate]) -> String {
    let mut out = String::from("Escolha o dia:\n");
    for (i, date) in dates.iter().enumerate() {
        out.push_str(&format!("{} - {}\n", i + 1, format_date(*date)));
    }
    out.push_str(BACK_OPTION);
    out
}

pub fn day_unavailable(dates: &[NaiveDate]) -> String {
    format!(
        "Desculpe, não há horários livres nesse dia. Escolha outro dia.\n\n{}",
        day_list(dates)
    )
}

pub fn slot_list(date: NaiveDate, slots: &[Slot]) -> String {
    let mut out = format!("Horários para {}:\n", format_date(date));
    for (i, slot) in slots.iter().enumerate() {
        if slot.is_available() {
            out.push_str(&format!("{} - {}\n", i + 1, slot.label()));
        } else {
            out.push_str(&format!("{} - {} (ocupado)\n", i + 1, slot.label()));
        }
    }
    out.push_str(BACK_OPTION);
    out
}

pub fn slot_occupied(date: NaiveDate, slots: &[Slot]) -> String {
    format!(
        "⚠️ Esse horário está ocupado. Escolha um horário livre.\n\n{}",
        slot_list(date, slots)
    )
}

pub fn confirmation(service: &ServiceOffering, date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "Confirma o agendamento?\n\
         Serviço: {} ({})\n\
         Data: {}\n\
         Horário: {}\n\n\
         1 - Sim\n\
         2 - Não",
        service.name,
        format_price(service.price),
        format_date(date),
        format_hhmm(time)
    )
}

pub fn not_confirmed(name: &str) -> String {
    format!("Agendamento não realizado.\n\n{}", main_menu(name))
}

pub fn booked(service: &ServiceOffering, date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "✅ Agendamento realizado!\n{} em {} às {}.\nAguardamos você!",
        service.name,
        format_date(date),
        format_hhmm(time)
    )
}

pub fn conflict_pick_time(date: NaiveDate, slots: &[Slot]) -> String {
    format!(
        "Que pena! Esse horário acabou de ser reservado por outra pessoa. \
         Veja os horários atualizados:\n\n{}",
        slot_list(date, slots)
    )
}

pub fn conflict_pick_day(dates: &[NaiveDate]) -> String {
    format!(
        "Que pena! Esse horário acabou de ser reservado e não restam horários \
         livres nesse dia. Escolha outro dia.\n\n{}",
        day_list(dates)
    )
}

/// Display name for an appointment's service
pub fn service_label(kind: ServiceKind) -> &'static str {
    match kind {
        ServiceKind::Cut => "Corte de Cabelo",
        ServiceKind::Beard => "Barba",
        ServiceKind::CutAndBeard => "Corte + Barba",
    }
}

/// "Seg 19/10"
pub fn format_date(date: NaiveDate) -> String {
    const WEEKDAYS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];
    format!(
        "{} {:02}/{:02}",
        WEEKDAYS[weekday_of(date) as usize],
        date.day(),
        date.month()
    )
}

/// "R$ 50,00"
pub fn format_price(price: Decimal) -> String {
    format!("R$ {:.2}", price).replace('.', ",")
}
